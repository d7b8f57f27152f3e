//! Error types for the storage crate

use thiserror::Error;

/// Failures surfaced by the blob-store collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Storage backend configuration is missing or inconsistent.
    #[error("storage backend misconfigured: {message}")]
    Config { message: String },

    /// Fetched object is not valid UTF-8 text.
    #[error("object {key:?} is not valid UTF-8 text")]
    NotText { key: String },

    /// The underlying store rejected or failed the operation.
    #[error("store unavailable: {0}")]
    Backend(#[from] opendal::Error),
}

impl StoreError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Failures from the cross-partition top-error scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Reduce(#[from] logsift_core::ReduceError),
}
