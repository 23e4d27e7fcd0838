//! Per-topic aggregates and lag extrema.

use std::collections::BTreeSet;

use crate::{Field, PartitionRecord};

/// All partitions of one topic with their figures summed.
///
/// Sums are computed once when the summary is built and never change. They
/// are kept as `i128` so adding any number of `i64` partition figures is
/// exact.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TopicSummary {
    topic: String,
    partitions: Vec<PartitionRecord>,
    offset_sum: i128,
    log_size_sum: i128,
    lag_sum: i128,
}

impl TopicSummary {
    /// Build a summary from the partitions of `topic`, in tool output order.
    pub fn from_partitions(topic: impl Into<String>, partitions: Vec<PartitionRecord>) -> Self {
        let total = |field: Field| {
            partitions
                .iter()
                .map(|p| i128::from(p.get(field)))
                .sum::<i128>()
        };
        Self {
            topic: topic.into(),
            offset_sum: total(Field::Offset),
            log_size_sum: total(Field::LogSize),
            lag_sum: total(Field::Lag),
            partitions,
        }
    }

    /// Topic name.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Partitions in the order the tool printed them.
    pub fn partitions(&self) -> &[PartitionRecord] {
        &self.partitions
    }

    /// Summed value of `field` across all partitions.
    pub fn sum(&self, field: Field) -> i128 {
        match field {
            Field::Offset => self.offset_sum,
            Field::LogSize => self.log_size_sum,
            Field::Lag => self.lag_sum,
        }
    }

    /// Summed lag across all partitions.
    pub fn lag_sum(&self) -> i128 {
        self.lag_sum
    }

    /// Whether any partition reports a negative value for `field`.
    pub fn has_negative(&self, field: Field) -> bool {
        self.partitions.iter().any(|p| p.get(field) < 0)
    }

    /// Whether any partition has no active consumer.
    pub fn has_unowned(&self) -> bool {
        self.partitions.iter().any(PartitionRecord::is_unowned)
    }
}

/// Highest and lowest per-topic lag, with every topic reaching each bound.
///
/// Topic sets are ordered by name so the result does not depend on the
/// order topics appeared in.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtremaResult {
    pub max_lag: i128,
    pub max_lag_topics: BTreeSet<String>,
    pub min_lag: i128,
    pub min_lag_topics: BTreeSet<String>,
}

impl ExtremaResult {
    /// Compute lag extrema over a set of topic summaries.
    ///
    /// Returns `None` when there are no topics.
    pub fn from_summaries<'a, I>(summaries: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a TopicSummary> + Clone,
    {
        let max_lag = summaries.clone().into_iter().map(TopicSummary::lag_sum).max()?;
        let min_lag = summaries.clone().into_iter().map(TopicSummary::lag_sum).min()?;

        let topics_at = |lag: i128| -> BTreeSet<String> {
            summaries
                .clone()
                .into_iter()
                .filter(|s| s.lag_sum() == lag)
                .map(|s| s.topic().to_string())
                .collect()
        };

        Some(Self {
            max_lag,
            max_lag_topics: topics_at(max_lag),
            min_lag,
            min_lag_topics: topics_at(min_lag),
        })
    }
}
