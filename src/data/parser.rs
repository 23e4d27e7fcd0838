//! Record parser for consumer group and topic list output.
//!
//! The Kafka tools print whitespace-aligned tables. Each row is split on runs
//! of whitespace into at most one token per expected column; the last column
//! takes the remainder of the line, so owners containing spaces stay intact.
//!
//! Parsing is lenient:
//!
//! - rows with fewer than two tokens are banner or noise lines and are dropped
//! - rows whose partition column is present but not an integer are dropped
//!   too; JVM warnings such as `SLF4J: ...` land among the rows because the
//!   tools' stderr is merged into their output
//! - missing trailing columns read as `0` (numbers) or an empty owner
//! - numeric tokens that do not parse (such as the `-` printed for partitions
//!   without a committed offset) read as `0` and are logged at `warn`

use tracing::{debug, warn};

use lagwatch_types::{Field, PartitionRecord};

use super::layout::{Column, Layout};

/// Name of Kafka's internal offsets topic.
pub const INTERNAL_OFFSETS_TOPIC: &str = "__consumer_offsets";

/// Marker printed next to topics pending deletion.
pub const DELETION_MARKER: &str = "marked for deletion";

/// Minimum number of tokens for a row to be kept.
const MIN_TOKENS: usize = 2;

/// Parses consumer group rows for a fixed list of columns.
#[derive(Debug, Clone)]
pub struct RecordParser {
    columns: Vec<Column>,
    skip_lines: usize,
}

impl RecordParser {
    /// Create a parser for `columns`, skipping `skip_lines` leading lines.
    pub fn new(columns: &[Column], skip_lines: usize) -> Self {
        Self {
            columns: columns.to_vec(),
            skip_lines,
        }
    }

    /// Create a parser for a known tool layout.
    pub fn for_layout(layout: Layout) -> Self {
        Self::new(layout.columns(), layout.header_lines())
    }

    /// Parse every row of `text` after the header.
    pub fn parse(&self, text: &str) -> Vec<PartitionRecord> {
        let mut dropped = 0;
        let records: Vec<PartitionRecord> = text
            .lines()
            .skip(self.skip_lines)
            .filter_map(|line| {
                let record = self.parse_line(line);
                if record.is_none() {
                    dropped += 1;
                }
                record
            })
            .collect();

        debug!(
            records = records.len(),
            dropped,
            skipped = self.skip_lines,
            "parsed consumer group output"
        );
        records
    }

    /// Parse a single row, or `None` if it is too short to be a partition.
    pub fn parse_line(&self, line: &str) -> Option<PartitionRecord> {
        let tokens = split_fields(line, self.columns.len());
        if tokens.len() < MIN_TOKENS {
            return None;
        }

        let token = |column: Column| {
            self.columns
                .iter()
                .position(|c| *c == column)
                .and_then(|index| tokens.get(index).copied())
        };

        let partition = token(Column::Partition).unwrap_or_default();
        if !partition.is_empty() && partition.parse::<u32>().is_err() {
            return None;
        }

        let topic = token(Column::Topic)?.to_string();
        Some(PartitionRecord {
            group: token(Column::Group).map(str::to_string),
            partition: partition.to_string(),
            offset: parse_number(token(Column::Offset), &topic, Field::Offset),
            log_size: parse_number(token(Column::LogSize), &topic, Field::LogSize),
            lag: parse_number(token(Column::Lag), &topic, Field::Lag),
            owner: token(Column::Owner).unwrap_or_default().to_string(),
            topic,
        })
    }
}

/// Split `line` on whitespace runs into at most `max` tokens.
///
/// The last token holds the rest of the line with its inner spacing intact.
pub fn split_fields(line: &str, max: usize) -> Vec<&str> {
    let mut tokens = Vec::with_capacity(max);
    if max == 0 {
        return tokens;
    }

    let mut rest = line.trim();
    while !rest.is_empty() {
        if tokens.len() + 1 == max {
            tokens.push(rest);
            break;
        }
        match rest.find(char::is_whitespace) {
            Some(end) => {
                tokens.push(&rest[..end]);
                rest = rest[end..].trim_start();
            }
            None => {
                tokens.push(rest);
                break;
            }
        }
    }
    tokens
}

fn parse_number(token: Option<&str>, topic: &str, field: Field) -> i64 {
    match token {
        None => 0,
        Some(token) => token.parse().unwrap_or_else(|_| {
            warn!(topic, field = field.name(), token, "non-numeric value read as 0");
            0
        }),
    }
}

/// Parse topic list output into real consumption targets.
///
/// Blank lines, Kafka's internal offsets topic and topics marked for deletion
/// are left out.
pub fn parse_topic_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.contains(INTERNAL_OFFSETS_TOPIC) && !line.contains(DELETION_MARKER))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONSUMER_GROUPS_OUTPUT: &str = "\
Note: This will only show information about consumers that use the Java consumer API.

GROUP TOPIC PARTITION CURRENT-OFFSET LOG-END-OFFSET LAG OWNER
orders    0   100   110   10   consumer-1_/10.0.0.1
orders    1   200   200   0    consumer-2_/10.0.0.2
payments  0   5     9     4    consumer-1_/10.0.0.1
";

    const LEGACY_OUTPUT: &str = "\
Group           Topic                          Pid Offset          logSize         Lag             Owner
g1              orders                         0   100             110             10              g1_host-1
g1              orders                         1   200             205             5               none
";

    #[test]
    fn splits_on_whitespace_runs() {
        assert_eq!(split_fields("  a   b\tc  ", 5), vec!["a", "b", "c"]);
    }

    #[test]
    fn last_field_absorbs_remainder() {
        assert_eq!(
            split_fields("t1 0 1 2 1 consumer one   (host)", 6),
            vec!["t1", "0", "1", "2", "1", "consumer one   (host)"]
        );
    }

    #[test]
    fn split_with_zero_fields_is_empty() {
        assert!(split_fields("a b", 0).is_empty());
    }

    #[test]
    fn parses_consumer_groups_layout() {
        let records = RecordParser::for_layout(Layout::ConsumerGroups).parse(CONSUMER_GROUPS_OUTPUT);

        assert_eq!(records.len(), 3);
        let first = &records[0];
        assert_eq!(first.group, None);
        assert_eq!(first.topic, "orders");
        assert_eq!(first.partition, "0");
        assert_eq!((first.offset, first.log_size, first.lag), (100, 110, 10));
        assert_eq!(first.owner, "consumer-1_/10.0.0.1");
        assert_eq!(records[2].topic, "payments");
    }

    #[test]
    fn parses_legacy_layout_with_group_column() {
        let records = RecordParser::for_layout(Layout::LegacyOffsetChecker).parse(LEGACY_OUTPUT);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].group.as_deref(), Some("g1"));
        assert_eq!(records[0].topic, "orders");
        assert_eq!(records[1].lag, 5);
        assert!(records[1].is_unowned());
    }

    #[test]
    fn header_skip_is_a_parameter() {
        let parser = RecordParser::new(Layout::ConsumerGroups.columns(), 0);
        let records = parser.parse("t1 0 1 1 0 c1\nt2 0 2 2 0 c2\n");
        assert_eq!(records.len(), 2);

        let parser = RecordParser::new(Layout::ConsumerGroups.columns(), 1);
        let records = parser.parse("t1 0 1 1 0 c1\nt2 0 2 2 0 c2\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].topic, "t2");
    }

    #[test]
    fn drops_lines_shorter_than_two_fields() {
        let parser = RecordParser::new(Layout::ConsumerGroups.columns(), 0);
        let records = parser.parse("\n   \nbanner\nt1 0 1 1 0 c1\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].topic, "t1");
    }

    #[test]
    fn drops_noise_rows_after_the_table() {
        let output = format!(
            "{}SLF4J: Class path contains multiple SLF4J bindings.\n\
             SLF4J: See http://www.slf4j.org/codes.html#multiple_bindings for an explanation.\n",
            CONSUMER_GROUPS_OUTPUT
        );
        let records = RecordParser::for_layout(Layout::ConsumerGroups).parse(&output);

        let topics: Vec<&str> = records.iter().map(|r| r.topic.as_str()).collect();
        assert_eq!(topics, vec!["orders", "orders", "payments"]);
    }

    #[test]
    fn drops_rows_with_non_numeric_partition() {
        let parser = RecordParser::for_layout(Layout::LegacyOffsetChecker);
        assert!(parser.parse_line("Group Topic Pid Offset logSize Lag Owner").is_none());
        assert!(parser.parse_line("g1 orders 2 1 1 0 c1").is_some());

        let parser = RecordParser::for_layout(Layout::ConsumerGroups);
        assert!(parser.parse_line("- - - - - consumer-1 /10.0.0.1").is_none());
    }

    #[test]
    fn short_line_fills_missing_fields_with_zero_and_empty_owner() {
        let parser = RecordParser::new(Layout::ConsumerGroups.columns(), 0);
        let record = parser.parse_line("t1 3 42").unwrap();

        assert_eq!(record.topic, "t1");
        assert_eq!(record.partition, "3");
        assert_eq!(record.offset, 42);
        assert_eq!(record.log_size, 0);
        assert_eq!(record.lag, 0);
        assert_eq!(record.owner, "");
        assert!(!record.is_unowned());
    }

    #[test]
    fn legacy_line_with_only_group_and_topic_is_kept() {
        let parser = RecordParser::for_layout(Layout::LegacyOffsetChecker);
        let record = parser.parse_line("g1 orders").unwrap();
        assert_eq!(record.group.as_deref(), Some("g1"));
        assert_eq!(record.topic, "orders");
        assert_eq!(record.lag, 0);
    }

    // Malformed numbers are not treated as parse failures: they read as 0.
    // This can hide a real problem (e.g. a column shift after a tool upgrade),
    // which is why every coercion is logged.
    #[test]
    fn malformed_numbers_coerce_to_zero() {
        let parser = RecordParser::new(Layout::ConsumerGroups.columns(), 0);
        let record = parser.parse_line("t1 0 - 120 abc c1").unwrap();
        assert_eq!(record.offset, 0);
        assert_eq!(record.log_size, 120);
        assert_eq!(record.lag, 0);
        assert_eq!(record.owner, "c1");
    }

    #[test]
    fn negative_numbers_are_preserved() {
        let parser = RecordParser::new(Layout::ConsumerGroups.columns(), 0);
        let record = parser.parse_line("t1 0 -1 10 11 c1").unwrap();
        assert_eq!(record.offset, -1);
    }

    #[test]
    fn topic_list_skips_internal_and_deleted_topics() {
        let text = "orders\n__consumer_offsets\n\nold-topic - marked for deletion\n  payments \n";
        assert_eq!(parse_topic_list(text), vec!["orders", "payments"]);
    }
}
