//! Aggregate block codec
//!
//! A block is the serialized form of one partition's count table, one
//! `<count> - <message>` line per distinct message.

use std::collections::BTreeMap;

use crate::error::BlockError;

/// Message text → occurrence count for one partition.
///
/// A `BTreeMap` so encoding and every fold over a table iterate in stable
/// lexicographic message order.
pub type CountTable = BTreeMap<String, u64>;

/// Delimiter between the count field and the message text.
const FIELD_DELIMITER: &str = " - ";

/// Render a count table as one line per distinct message.
///
/// Lines are joined with `\n` and carry no trailing newline. Output order is
/// lexicographic by message; consumers must not rely on it.
pub fn encode_block(table: &CountTable) -> String {
    let lines: Vec<String> = table
        .iter()
        .map(|(message, count)| format!("{count}{FIELD_DELIMITER}{message}"))
        .collect();
    lines.join("\n")
}

/// Parse an aggregate block back into a count table.
///
/// Each line splits on the first ` - `: the left side must parse as a
/// non-negative integer, the right side is the message verbatim (the message
/// may itself contain ` - `). The empty block decodes to the empty table.
/// Fail-fast: the first bad line aborts the whole block.
pub fn decode_block(block: &str) -> Result<CountTable, BlockError> {
    let mut table = CountTable::new();
    for line in block.lines() {
        let (count, message) =
            line.split_once(FIELD_DELIMITER)
                .ok_or_else(|| BlockError::Malformed {
                    line: line.to_string(),
                })?;
        let count: u64 = count.parse().map_err(|source| BlockError::Count {
            line: line.to_string(),
            source,
        })?;
        table.insert(message.to_string(), count);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, u64)]) -> CountTable {
        pairs
            .iter()
            .map(|(m, c)| (m.to_string(), *c))
            .collect()
    }

    #[test]
    fn encodes_one_line_per_message() {
        let encoded = encode_block(&table(&[("invalid token", 2), ("slow query", 1)]));
        assert_eq!(encoded, "2 - invalid token\n1 - slow query");
    }

    #[test]
    fn empty_table_encodes_to_empty_block() {
        assert_eq!(encode_block(&CountTable::new()), "");
        assert!(decode_block("").unwrap().is_empty());
    }

    #[test]
    fn round_trips_any_table() {
        let original = table(&[
            ("connection reset by peer", 41),
            ("invalid token", 2),
            ("slow query", 1),
        ]);
        assert_eq!(decode_block(&encode_block(&original)).unwrap(), original);
    }

    #[test]
    fn round_trip_survives_reordered_lines() {
        let reordered = "1 - slow query\n2 - invalid token";
        assert_eq!(
            decode_block(reordered).unwrap(),
            table(&[("invalid token", 2), ("slow query", 1)])
        );
    }

    #[test]
    fn splits_on_the_first_delimiter_only() {
        let decoded = decode_block("3 - upstream - connection refused").unwrap();
        assert_eq!(decoded.get("upstream - connection refused"), Some(&3));
    }

    #[test]
    fn missing_delimiter_is_malformed() {
        assert!(matches!(
            decode_block("2 invalid token"),
            Err(BlockError::Malformed { .. })
        ));
    }

    #[test]
    fn non_integer_count_is_rejected() {
        for block in ["two - invalid token", "-1 - invalid token", " - message"] {
            assert!(matches!(
                decode_block(block),
                Err(BlockError::Count { .. }) | Err(BlockError::Malformed { .. })
            ));
        }
        assert!(matches!(
            decode_block("2x - invalid token"),
            Err(BlockError::Count { .. })
        ));
    }

    #[test]
    fn bad_line_aborts_the_whole_block() {
        assert!(decode_block("2 - fine\nbroken\n1 - also fine").is_err());
    }
}
