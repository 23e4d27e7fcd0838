//! Topic aggregation and topic filtering.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use lagwatch_types::{PartitionRecord, TopicSummary};

/// Per-topic summaries in the order topics first appeared in tool output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicTable {
    summaries: Vec<TopicSummary>,
}

impl TopicTable {
    /// Group `records` by topic and sum their figures.
    ///
    /// Topics are matched exactly (case-sensitive). Partitions keep their
    /// relative order within each topic.
    pub fn aggregate<I>(records: I) -> Self
    where
        I: IntoIterator<Item = PartitionRecord>,
    {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<(String, Vec<PartitionRecord>)> = Vec::new();

        for record in records {
            match index.get(&record.topic) {
                Some(&position) => groups[position].1.push(record),
                None => {
                    index.insert(record.topic.clone(), groups.len());
                    groups.push((record.topic.clone(), vec![record]));
                }
            }
        }

        let summaries = groups
            .into_iter()
            .map(|(topic, partitions)| TopicSummary::from_partitions(topic, partitions))
            .collect();

        Self { summaries }
    }

    /// Keep only topics accepted by `filter`.
    pub fn filter(self, filter: &TopicFilter) -> Self {
        let (kept, removed): (Vec<_>, Vec<_>) = self
            .summaries
            .into_iter()
            .partition(|s| filter.allows(s.topic()));

        if !removed.is_empty() {
            let names: Vec<_> = removed.iter().map(TopicSummary::topic).collect();
            debug!(topics = ?names, "filtered out topics");
        }

        Self { summaries: kept }
    }

    /// Iterate over summaries in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, TopicSummary> {
        self.summaries.iter()
    }

    /// Topic names in first-seen order.
    pub fn topics(&self) -> Vec<&str> {
        self.summaries.iter().map(TopicSummary::topic).collect()
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}

impl<'a> IntoIterator for &'a TopicTable {
    type Item = &'a TopicSummary;
    type IntoIter = std::slice::Iter<'a, TopicSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.summaries.iter()
    }
}

/// Topic allow-list and exclude-list.
///
/// A topic passes when it is in the allow-list (or no allow-list is set) and
/// is not in the exclude-list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicFilter {
    allow: Option<BTreeSet<String>>,
    exclude: BTreeSet<String>,
}

impl TopicFilter {
    /// A filter that accepts every topic.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to the given topics.
    pub fn allow<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow = Some(topics.into_iter().map(Into::into).collect());
        self
    }

    /// Drop the given topics.
    pub fn exclude<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(topics.into_iter().map(Into::into));
        self
    }

    /// Whether `topic` passes the filter.
    pub fn allows(&self, topic: &str) -> bool {
        let allowed = self.allow.as_ref().map_or(true, |allow| allow.contains(topic));
        allowed && !self.exclude.contains(topic)
    }

    /// Whether the filter accepts everything.
    pub fn is_empty(&self) -> bool {
        self.allow.is_none() && self.exclude.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lagwatch_types::Field;

    fn record(topic: &str, pid: &str, offset: i64, log_size: i64, lag: i64) -> PartitionRecord {
        PartitionRecord::new(topic, pid)
            .with_figures(offset, log_size, lag)
            .with_owner("c1")
    }

    fn summary<'a>(table: &'a TopicTable, topic: &str) -> &'a TopicSummary {
        table.iter().find(|s| s.topic() == topic).unwrap()
    }

    #[test]
    fn groups_by_topic_in_first_seen_order() {
        let table = TopicTable::aggregate(vec![
            record("b", "0", 1, 2, 1),
            record("a", "0", 3, 4, 1),
            record("b", "1", 5, 6, 1),
        ]);

        assert_eq!(table.topics(), vec!["b", "a"]);
        let b = summary(&table, "b");
        assert_eq!(b.partitions().len(), 2);
        assert_eq!(b.partitions()[0].partition, "0");
        assert_eq!(b.partitions()[1].partition, "1");
    }

    #[test]
    fn sums_are_exact_per_topic() {
        let table = TopicTable::aggregate(vec![
            record("t1", "0", 100, 110, 10),
            record("t1", "1", 7, 9, 2),
            record("t2", "0", -1, 4, 5),
        ]);

        let t1 = summary(&table, "t1");
        assert_eq!(t1.sum(Field::Offset), 107);
        assert_eq!(t1.sum(Field::LogSize), 119);
        assert_eq!(t1.sum(Field::Lag), 12);

        let t2 = summary(&table, "t2");
        assert_eq!(t2.sum(Field::Offset), -1);
    }

    #[test]
    fn topic_set_matches_distinct_input_topics() {
        let records = vec![
            record("x", "0", 0, 0, 0),
            record("X", "0", 0, 0, 0),
            record("y", "0", 0, 0, 0),
            record("x", "1", 0, 0, 0),
        ];
        let distinct: BTreeSet<_> = records.iter().map(|r| r.topic.clone()).collect();

        let table = TopicTable::aggregate(records);
        let topics: BTreeSet<_> = table.topics().into_iter().map(str::to_string).collect();
        assert_eq!(topics, distinct);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn empty_input_gives_empty_table() {
        let table = TopicTable::aggregate(Vec::new());
        assert!(table.is_empty());
    }

    #[test]
    fn filter_applies_allow_then_exclude() {
        let filter = TopicFilter::new().allow(["t1", "t2"]).exclude(["t2"]);
        assert!(filter.allows("t1"));
        assert!(!filter.allows("t2"));
        assert!(!filter.allows("t3"));
    }

    #[test]
    fn empty_filter_allows_everything() {
        let filter = TopicFilter::new();
        assert!(filter.is_empty());
        assert!(filter.allows("anything"));
    }

    #[test]
    fn filtered_table_drops_excluded_topics() {
        let table = TopicTable::aggregate(vec![record("t1", "0", 1, 1, 0), record("t2", "0", 1, 1, 0)])
            .filter(&TopicFilter::new().exclude(["t2"]));

        assert_eq!(table.topics(), vec!["t1"]);
        assert_eq!(table.len(), 1);
    }
}
