//! Raw log line parsing

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::ParseError;

/// Strict second-resolution UTC format of the leading timestamp field.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// One structured record parsed from a raw input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub severity: String,
    pub service: String,
    pub message: String,
}

/// Parse a single line of the form
/// `2024-01-01T10:15:00Z ERROR [auth] invalid token`.
///
/// Only the first three spaces are structural; the message keeps any further
/// spaces verbatim. The service field has its enclosing brackets stripped and
/// is otherwise untouched (no case or whitespace normalization).
pub fn parse_line(line: &str) -> Result<LogEntry, ParseError> {
    let mut fields = line.splitn(4, ' ');
    let (Some(timestamp), Some(severity), Some(service), Some(message)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(ParseError::Format {
            line: line.to_string(),
        });
    };

    let timestamp = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
        .map_err(|source| ParseError::Timestamp {
            token: timestamp.to_string(),
            source,
        })?
        .and_utc();

    Ok(LogEntry {
        timestamp,
        severity: severity.to_string(),
        service: service
            .trim_matches(|c| c == '[' || c == ']')
            .to_string(),
        message: message.to_string(),
    })
}

/// Parse an entire uploaded file.
///
/// Fail-fast and whole-batch: the first malformed line aborts with no
/// partial result, so nothing from a bad file ever reaches the aggregator.
pub fn parse_lines(input: &str) -> Result<Vec<LogEntry>, ParseError> {
    input.lines().map(parse_line).collect()
}
