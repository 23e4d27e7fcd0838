//! Column layouts of the consumer group tools.

/// A column in consumer group output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Group,
    Topic,
    Partition,
    Offset,
    LogSize,
    Lag,
    Owner,
}

/// Output format of the tool that described the consumer group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `kafka.tools.ConsumerOffsetChecker`: one header line, then
    /// `group topic pid offset logsize lag owner`.
    LegacyOffsetChecker,
    /// `kafka-consumer-groups.sh --describe`: three banner lines, then
    /// `topic pid offset logsize lag owner`.
    ConsumerGroups,
}

const LEGACY_COLUMNS: &[Column] = &[
    Column::Group,
    Column::Topic,
    Column::Partition,
    Column::Offset,
    Column::LogSize,
    Column::Lag,
    Column::Owner,
];

const CONSUMER_GROUPS_COLUMNS: &[Column] = &[
    Column::Topic,
    Column::Partition,
    Column::Offset,
    Column::LogSize,
    Column::Lag,
    Column::Owner,
];

impl Layout {
    /// Layout produced for groups using the new consumer protocol or not.
    pub fn for_protocol(new_consumer: bool) -> Self {
        if new_consumer {
            Layout::ConsumerGroups
        } else {
            Layout::LegacyOffsetChecker
        }
    }

    /// Leading lines to skip before partition rows start.
    pub fn header_lines(&self) -> usize {
        match self {
            Layout::LegacyOffsetChecker => 1,
            Layout::ConsumerGroups => 3,
        }
    }

    /// Columns in output order.
    pub fn columns(&self) -> &'static [Column] {
        match self {
            Layout::LegacyOffsetChecker => LEGACY_COLUMNS,
            Layout::ConsumerGroups => CONSUMER_GROUPS_COLUMNS,
        }
    }
}
