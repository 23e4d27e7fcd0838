//! Parsing, aggregation and evaluation of consumer group output.
//!
//! ## Submodules
//!
//! - [`layout`]: Column layouts of the Kafka tools
//! - [`parser`]: Raw text to [`PartitionRecord`](lagwatch_types::PartitionRecord)s
//! - [`aggregate`]: Per-topic sums ([`TopicTable`]) and topic filtering
//! - [`thresholds`]: Integrity validation and lag bounds for the check
//! - [`metrics`]: Projection to metric points
//!
//! ## Data Flow
//!
//! ```text
//! tool output (raw text)
//!        │
//!        ▼
//! RecordParser::parse()
//!        │
//!        ▼
//! TopicTable::aggregate()
//!        │
//!        ├──▶ ThresholdEvaluator::evaluate() ──▶ Verdict
//!        │
//!        └──▶ MetricsProjector::project()    ──▶ Vec<MetricPoint>
//! ```

pub mod aggregate;
pub mod layout;
pub mod metrics;
pub mod parser;
pub mod thresholds;

pub use aggregate::{TopicFilter, TopicTable};
pub use layout::{Column, Layout};
pub use metrics::{MetricsProjector, DEFAULT_SCHEME};
pub use parser::{parse_topic_list, RecordParser};
pub use thresholds::{Evaluation, ThresholdEvaluator, Thresholds, Violation};
