//! Cross-partition top-error reduction

use serde::Serialize;

use crate::block::decode_block;
use crate::error::ReduceError;
use crate::partition::partition_labels;

/// The most frequent message across a scanned set of partitions.
///
/// `count == 0` is the "no data" sentinel; a genuine finding always has
/// `count >= 1`. Serializes with the wire field name `top-error` for the
/// message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TopError {
    #[serde(rename = "top-error")]
    pub message: String,
    pub count: u64,
    pub service: String,
    pub severity: String,
}

impl TopError {
    /// The zero-count sentinel returned when no partition holds data.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether this record is the "no data" sentinel.
    pub fn is_none(&self) -> bool {
        self.count == 0
    }

    /// Max-monoid merge: the strictly higher count wins, a tie keeps `self`.
    ///
    /// Commutative and associative up to tie-breaking, so pairwise merges of
    /// independently reduced subsets agree with a sequential fold as long as
    /// the same partition ordering is used.
    #[must_use]
    pub fn merge(self, other: TopError) -> TopError {
        if other.count > self.count {
            other
        } else {
            self
        }
    }
}

/// Fold one fetched partition into the running best record.
///
/// Service and severity for every candidate come from the partition key; a
/// key with too few segments fails with [`ReduceError::PathFormat`] before
/// the block is decoded.
pub fn fold_block(best: TopError, path: &str, block: &str) -> Result<TopError, ReduceError> {
    let (service, severity) = partition_labels(path)?;
    let table = decode_block(block).map_err(|source| ReduceError::Block {
        path: path.to_string(),
        source,
    })?;

    Ok(table.into_iter().fold(best, |best, (message, count)| {
        best.merge(TopError {
            message,
            count,
            service: service.to_string(),
            severity: severity.to_string(),
        })
    }))
}

/// Reduce a sequence of `(partition key, block contents)` pairs to the single
/// top record. The empty sequence yields the sentinel.
///
/// Tie-break rule: pairs are folded in the order given and messages within a
/// block in lexicographic order; the first candidate reaching the maximum
/// count wins. Callers wanting a deterministic result feed partitions in
/// ascending key order.
pub fn reduce<'a, I>(partitions: I) -> Result<TopError, ReduceError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    partitions
        .into_iter()
        .try_fold(TopError::none(), |best, (path, block)| {
            fold_block(best, path, block)
        })
}
