//! Partition key format shared by the aggregator and the reducer
//!
//! Keys look like:
//! `logsift/aggregates/2024-01-01T10:00:00-11:00:00/auth/ERROR/sample.log`
//!
//! The aggregator builds keys with [`partition_path`]; the reducer reads
//! service and severity back out with [`partition_labels`]. Both sides share
//! the segment indices below, so a change to the prefix depth cannot drift
//! between them.

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::ReduceError;

/// Fixed key prefix for every aggregate object.
pub const OBJECT_PREFIX: &str = "logsift/aggregates";

/// Object basename for every aggregate block.
const OBJECT_NAME: &str = "sample.log";

/// Positional layout of a key split on `/`:
/// prefix (2 segments), window, service, severity, basename.
const SERVICE_SEGMENT: usize = 3;
const SEVERITY_SEGMENT: usize = 4;
const MIN_SEGMENTS: usize = 6;

/// Build the object key for one (window, service, severity) partition.
///
/// The mapping must stay injective: the window start renders second-exact,
/// and service/severity are used verbatim, so tokens containing `/` would
/// shift the positional fields read back by [`partition_labels`].
pub fn partition_path(window_start: DateTime<Utc>, service: &str, severity: &str) -> String {
    let window_end = window_start + TimeDelta::hours(1);
    format!(
        "{}/{}-{}/{}/{}/{}",
        OBJECT_PREFIX,
        window_start.format("%Y-%m-%dT%H:%M:%S"),
        window_end.format("%H:%M:%S"),
        service,
        severity,
        OBJECT_NAME,
    )
}

/// Extract `(service, severity)` from a partition key.
pub fn partition_labels(path: &str) -> Result<(&str, &str), ReduceError> {
    let segments: Vec<&str> = path.split('/').collect();
    if segments.len() < MIN_SEGMENTS {
        return Err(ReduceError::PathFormat {
            path: path.to_string(),
            expected: MIN_SEGMENTS,
        });
    }
    Ok((segments[SERVICE_SEGMENT], segments[SEVERITY_SEGMENT]))
}
