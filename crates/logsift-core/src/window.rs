//! Hourly windowing and per-partition aggregation

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::block::CountTable;
use crate::entry::LogEntry;
use crate::partition::partition_path;

/// Floor a timestamp to the start of its one-hour window.
fn window_start(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    let secs = timestamp.timestamp();
    // Flooring an in-range timestamp stays in range.
    DateTime::from_timestamp(secs - secs.rem_euclid(3600), 0).unwrap_or(timestamp)
}

/// Group entries into hourly service/severity partitions, counting identical
/// messages within each partition.
///
/// Entries may arrive in any order. The accumulator is owned by this call;
/// concurrent aggregation runs cannot observe each other.
pub fn aggregate(entries: impl IntoIterator<Item = LogEntry>) -> BTreeMap<String, CountTable> {
    let mut partitions: BTreeMap<String, CountTable> = BTreeMap::new();

    for entry in entries {
        let path = partition_path(
            window_start(entry.timestamp),
            &entry.service,
            &entry.severity,
        );
        *partitions
            .entry(path)
            .or_default()
            .entry(entry.message)
            .or_insert(0) += 1;
    }

    tracing::debug!(partitions = partitions.len(), "aggregated log entries");
    partitions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::parse_lines;
    use chrono::TimeZone;

    fn entry(ts: &str, severity: &str, service: &str, message: &str) -> LogEntry {
        crate::parse_line(&format!("{ts} {severity} [{service}] {message}")).unwrap()
    }

    #[test]
    fn floors_timestamps_to_the_hour() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 10, 59, 59).unwrap();
        assert_eq!(
            window_start(ts),
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
        );

        let exact = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        assert_eq!(window_start(exact), exact);
    }

    #[test]
    fn same_window_service_severity_share_a_partition() {
        let partitions = aggregate([
            entry("2024-01-01T10:15:00Z", "ERROR", "auth", "invalid token"),
            entry("2024-01-01T10:45:00Z", "ERROR", "auth", "invalid token"),
            entry("2024-01-01T10:50:00Z", "ERROR", "auth", "expired session"),
        ]);

        assert_eq!(partitions.len(), 1);
        let table = partitions
            .get("logsift/aggregates/2024-01-01T10:00:00-11:00:00/auth/ERROR/sample.log")
            .unwrap();
        assert_eq!(table.get("invalid token"), Some(&2));
        assert_eq!(table.get("expired session"), Some(&1));
    }

    #[test]
    fn severity_and_service_split_partitions() {
        let partitions = aggregate([
            entry("2024-01-01T10:15:00Z", "ERROR", "auth", "a"),
            entry("2024-01-01T10:15:00Z", "WARN", "auth", "a"),
            entry("2024-01-01T10:15:00Z", "ERROR", "db", "a"),
        ]);
        assert_eq!(partitions.len(), 3);
    }

    #[test]
    fn input_order_does_not_matter() {
        let forward = aggregate([
            entry("2024-01-01T10:15:00Z", "ERROR", "auth", "a"),
            entry("2024-01-01T11:15:00Z", "ERROR", "auth", "b"),
        ]);
        let backward = aggregate([
            entry("2024-01-01T11:15:00Z", "ERROR", "auth", "b"),
            entry("2024-01-01T10:15:00Z", "ERROR", "auth", "a"),
        ]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn empty_input_yields_empty_mapping() {
        assert!(aggregate([]).is_empty());
    }

    #[test]
    fn counts_match_occurrences_of_exact_message_text() {
        let input = "2024-01-01T10:15:00Z ERROR [auth] invalid token\n\
                     2024-01-01T10:45:00Z ERROR [auth] invalid token\n\
                     2024-01-01T10:50:00Z ERROR [auth] invalid token \n\
                     2024-01-01T10:51:00Z ERROR [auth] Invalid token";
        let partitions = aggregate(parse_lines(input).unwrap());
        let table = partitions
            .get("logsift/aggregates/2024-01-01T10:00:00-11:00:00/auth/ERROR/sample.log")
            .unwrap();

        // Byte-exact message text: trailing space and case both distinguish.
        assert_eq!(table.get("invalid token"), Some(&2));
        assert_eq!(table.get("invalid token "), Some(&1));
        assert_eq!(table.get("Invalid token"), Some(&1));
    }
}
