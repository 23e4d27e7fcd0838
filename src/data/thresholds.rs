//! Threshold evaluation for the alerting check.
//!
//! Evaluation is a single pass:
//!
//! ```text
//! TopicTable ──▶ validate ──▶ extrema ──▶ bounds ──▶ Verdict
//!                   │
//!                   └──▶ Violation(s) ──▶ CRITICAL
//! ```

use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use tracing::debug;

use lagwatch_types::{ExtremaResult, Field, Status, TopicSummary, Verdict};

use super::aggregate::TopicTable;
use crate::error::CheckError;

/// Optional lag bounds.
///
/// `*_over` bounds fire when the highest topic lag exceeds them, `*_under`
/// bounds fire when the lowest topic lag falls below them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub warning_over: Option<i64>,
    pub critical_over: Option<i64>,
    pub warning_under: Option<i64>,
    pub critical_under: Option<i64>,
}

impl Thresholds {
    /// Whether no bound is configured.
    pub fn is_empty(&self) -> bool {
        self.bounds().iter().all(|(_, _, limit)| limit.is_none())
    }

    /// Bounds in evaluation order: over before under, and critical before
    /// warning within each direction.
    fn bounds(&self) -> [(Status, Direction, Option<i64>); 4] {
        [
            (Status::Critical, Direction::Over, self.critical_over),
            (Status::Warning, Direction::Over, self.warning_over),
            (Status::Critical, Direction::Under, self.critical_under),
            (Status::Warning, Direction::Under, self.warning_under),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Over,
    Under,
}

/// A data integrity problem found before thresholds are looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Some partition of the topic reports a negative value.
    Negative { topic: String, field: Field },
    /// Some partition of the topic has no consumer.
    Unowned { topic: String },
}

impl Violation {
    pub fn topic(&self) -> &str {
        match self {
            Violation::Negative { topic, .. } | Violation::Unowned { topic } => topic,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Negative { topic, field } => {
                write!(f, "Topic {} has partitions with {} < 0", topic, field)
            }
            Violation::Unowned { topic } => {
                write!(f, "Topic {} has partitions with no owner", topic)
            }
        }
    }
}

/// Find every integrity violation in `table`.
///
/// Negative offsets are reported first, then negative log sizes, then
/// unowned partitions; topics keep table order within each group.
pub fn validate(table: &TopicTable) -> Vec<Violation> {
    let negatives = [Field::Offset, Field::LogSize].into_iter().flat_map(move |field| {
        table
            .iter()
            .filter(move |s| s.has_negative(field))
            .map(move |s| Violation::Negative {
                topic: s.topic().to_string(),
                field,
            })
    });

    let unowned = table
        .iter()
        .filter(|s| s.has_unowned())
        .map(|s| Violation::Unowned {
            topic: s.topic().to_string(),
        });

    negatives.chain(unowned).collect()
}

/// Outcome of a successful evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub extrema: ExtremaResult,
    pub verdict: Verdict,
}

/// Evaluates per-topic lag for one consumer group.
#[derive(Debug, Clone)]
pub struct ThresholdEvaluator<'a> {
    group: &'a str,
    thresholds: Thresholds,
}

impl<'a> ThresholdEvaluator<'a> {
    pub fn new(group: &'a str, thresholds: Thresholds) -> Self {
        Self { group, thresholds }
    }

    /// Validate `table`, compute lag extrema and compare them to the bounds.
    ///
    /// An empty table or any integrity violation is an error. Otherwise the
    /// first bound crossed, in [`Thresholds`] evaluation order, decides the
    /// verdict; if none is crossed the verdict is OK.
    pub fn evaluate(&self, table: &TopicTable) -> Result<Evaluation, CheckError> {
        if table.is_empty() {
            return Err(CheckError::NoTopics);
        }

        let violations = validate(table);
        if !violations.is_empty() {
            return Err(CheckError::Integrity(violations));
        }

        let extrema = ExtremaResult::from_summaries(table).ok_or(CheckError::NoTopics)?;
        debug!(
            max_lag = extrema.max_lag,
            min_lag = extrema.min_lag,
            "computed lag extrema"
        );

        let verdict = self
            .thresholds
            .bounds()
            .into_iter()
            .find_map(|(severity, direction, limit)| {
                let limit = limit?;
                match direction {
                    Direction::Over if extrema.max_lag > i128::from(limit) => Some(Verdict::new(
                        severity,
                        self.breach_message(&extrema.max_lag_topics, extrema.max_lag, '>', limit),
                    )),
                    Direction::Under if extrema.min_lag < i128::from(limit) => Some(Verdict::new(
                        severity,
                        self.breach_message(&extrema.min_lag_topics, extrema.min_lag, '<', limit),
                    )),
                    _ => None,
                }
            })
            .unwrap_or_else(|| {
                Verdict::ok(format!(
                    "Group `{}`'s lag is ok ({}/{})",
                    self.group, extrema.min_lag, extrema.max_lag
                ))
            });

        Ok(Evaluation { extrema, verdict })
    }

    fn breach_message(&self, topics: &BTreeSet<String>, lag: i128, op: char, limit: i64) -> String {
        let topics: Vec<&str> = topics.iter().map(String::as_str).collect();
        format!(
            "Topics `{}` for the group `{}` lag: {} ({} {})",
            topics.join(", "),
            self.group,
            lag,
            op,
            limit
        )
    }
}

/// Sum of lag across every topic, for logging.
pub fn total_lag(table: &TopicTable) -> i128 {
    table.iter().map(TopicSummary::lag_sum).sum()
}
