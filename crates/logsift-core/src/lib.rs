//! Core log aggregation pipeline: parse raw lines, bucket them into hourly
//! service/severity partitions, encode per-partition message counters, and
//! reduce a set of persisted partitions to the single most frequent message.
//!
//! Everything in this crate is pure and synchronous. Blob-store I/O lives in
//! `logsift-storage`, the HTTP surface in `logsift-server`.

pub mod block;
pub mod entry;
pub mod error;
pub mod partition;
pub mod reduce;
pub mod window;

pub use block::{decode_block, encode_block, CountTable};
pub use entry::{parse_line, parse_lines, LogEntry};
pub use error::{BlockError, ParseError, ReduceError};
pub use partition::{partition_labels, partition_path, OBJECT_PREFIX};
pub use reduce::{fold_block, reduce, TopError};
pub use window::aggregate;
