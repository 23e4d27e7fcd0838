//! # lagwatch-types
//!
//! Core types shared by the lagwatch consumer lag check and metrics emitter.
//!
//! The types describe one snapshot of a consumer group as reported by Kafka's
//! command-line tools:
//!
//! - [`PartitionRecord`]: one row of tool output (one partition)
//! - [`TopicSummary`]: all partitions of a topic with their summed figures
//! - [`ExtremaResult`]: the topics holding the highest and lowest lag
//! - [`MetricPoint`]: a named, timestamped value ready for a time-series sink
//! - [`Verdict`]: the single outcome of an alerting check
//!
//! ## Features
//!
//! - `serde`: derive `Serialize`/`Deserialize` for all types
//!
//! ## Example
//!
//! ```rust
//! use lagwatch_types::{Field, PartitionRecord, TopicSummary};
//!
//! let partitions = vec![
//!     PartitionRecord::new("orders", "0").with_figures(100, 110, 10),
//!     PartitionRecord::new("orders", "1").with_figures(200, 205, 5),
//! ];
//!
//! let summary = TopicSummary::from_partitions("orders", partitions);
//! assert_eq!(summary.sum(Field::Lag), 15);
//! assert_eq!(summary.sum(Field::LogSize), 315);
//! ```

mod metric;
mod record;
mod summary;
mod verdict;

pub use metric::*;
pub use record::*;
pub use summary::*;
pub use verdict::*;
