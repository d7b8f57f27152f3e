//! Error types for the core aggregation pipeline

use std::num::ParseIntError;
use thiserror::Error;

/// Errors from parsing raw log lines.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Line does not split into timestamp, severity, service and message.
    #[error("invalid log format, expected 'TIMESTAMP SEVERITY [SERVICE] MESSAGE': {line:?}")]
    Format { line: String },

    /// Leading field is not a strict `YYYY-MM-DDTHH:MM:SSZ` UTC timestamp.
    #[error("invalid timestamp {token:?}")]
    Timestamp {
        token: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Errors from decoding an aggregate block.
#[derive(Debug, Error)]
pub enum BlockError {
    /// Line is missing the ` - ` delimiter between count and message.
    #[error("malformed aggregate line {line:?}")]
    Malformed { line: String },

    /// Count field does not parse as a non-negative integer.
    #[error("invalid count in aggregate line {line:?}")]
    Count {
        line: String,
        #[source]
        source: ParseIntError,
    },
}

/// Errors from reducing persisted partitions.
#[derive(Debug, Error)]
pub enum ReduceError {
    /// Object key is too short to carry the partition segment layout.
    #[error("invalid partition key {path:?}: expected at least {expected} segments")]
    PathFormat { path: String, expected: usize },

    /// A fetched partition failed to decode.
    #[error("partition {path}")]
    Block {
        path: String,
        #[source]
        source: BlockError,
    },
}
