//! Per-partition records parsed from tool output.

use std::fmt;

/// Owner value the Kafka tools print for a partition nobody consumes.
pub const NO_OWNER: &str = "none";

/// Numeric columns reported for every partition.
///
/// The declaration order is the order metrics are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Field {
    /// Committed consumer offset.
    Offset,
    /// Log end offset of the partition.
    LogSize,
    /// Log size minus committed offset.
    Lag,
}

impl Field {
    /// All numeric fields, in emission order.
    pub const ALL: [Field; 3] = [Field::Offset, Field::LogSize, Field::Lag];

    /// Name used in metric paths and messages.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Offset => "offset",
            Field::LogSize => "logsize",
            Field::Lag => "lag",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of consumer group output, describing a single partition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartitionRecord {
    /// Consumer group, only present in the legacy offset checker layout.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub group: Option<String>,

    /// Topic the partition belongs to.
    pub topic: String,

    /// Partition id as printed by the tool. Never used arithmetically.
    pub partition: String,

    /// Committed consumer offset.
    pub offset: i64,

    /// Log end offset.
    pub log_size: i64,

    /// Reported lag.
    pub lag: i64,

    /// Consumer instance that owns the partition, or [`NO_OWNER`].
    pub owner: String,
}

impl PartitionRecord {
    /// Create a record with zeroed figures and no owner string.
    pub fn new(topic: impl Into<String>, partition: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            partition: partition.into(),
            ..Self::default()
        }
    }

    /// Set offset, log size and lag in one go.
    pub fn with_figures(mut self, offset: i64, log_size: i64, lag: i64) -> Self {
        self.offset = offset;
        self.log_size = log_size;
        self.lag = lag;
        self
    }

    /// Set the owner.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Set the consumer group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Read a numeric field.
    pub fn get(&self, field: Field) -> i64 {
        match field {
            Field::Offset => self.offset,
            Field::LogSize => self.log_size,
            Field::Lag => self.lag,
        }
    }

    /// Whether no consumer is currently assigned to this partition.
    pub fn is_unowned(&self) -> bool {
        self.owner == NO_OWNER
    }
}
