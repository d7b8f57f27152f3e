//! Aggregate partition upload

use std::collections::BTreeMap;

use logsift_core::{encode_block, CountTable};

use crate::error::StoreError;
use crate::store::BlobStore;

/// Encode and persist one object per partition.
///
/// Writes are sequential and best-effort: a failure partway through leaves
/// earlier partitions persisted and later ones missing, and the whole upload
/// is reported failed. Returns the keys written, in key order.
pub async fn upload_partitions(
    store: &BlobStore,
    partitions: &BTreeMap<String, CountTable>,
) -> Result<Vec<String>, StoreError> {
    let mut written = Vec::with_capacity(partitions.len());

    for (key, table) in partitions {
        store.put(key, encode_block(table)).await?;
        tracing::debug!(key = %key, messages = table.len(), "uploaded partition");
        written.push(key.clone());
    }

    Ok(written)
}
