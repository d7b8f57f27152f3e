//! Cross-partition top-error scan

use futures::{stream, StreamExt};

use logsift_core::{fold_block, partition_labels, TopError, OBJECT_PREFIX};

use crate::error::ScanError;
use crate::store::BlobStore;

/// Concurrent partition fetches in flight during a scan.
const FETCH_CONCURRENCY: usize = 8;

/// Reduce every persisted partition under the aggregate prefix to the single
/// most frequent message.
///
/// Keys are folded in ascending lexicographic order, the documented
/// tie-break. Fetches run concurrently; `buffered` yields results in
/// submission order, so concurrency does not perturb the fold. Fail-fast:
/// the first store failure or malformed partition aborts the whole scan.
pub async fn scan_top_error(store: &BlobStore) -> Result<TopError, ScanError> {
    let mut keys = store.list(&format!("{OBJECT_PREFIX}/")).await?;
    keys.sort();
    tracing::debug!(partitions = keys.len(), "scanning aggregate partitions");

    // Every key must carry the partition segment layout before anything is
    // fetched.
    for key in &keys {
        partition_labels(key)?;
    }

    let mut fetches = stream::iter(keys.into_iter().map(|key| async move {
        let block = store.get(&key).await?;
        Ok::<_, ScanError>((key, block))
    }))
    .buffered(FETCH_CONCURRENCY);

    let mut best = TopError::none();
    while let Some(fetched) = fetches.next().await {
        let (key, block) = fetched?;
        best = fold_block(best, &key, &block)?;
    }

    Ok(best)
}
