//! # lagwatch
//!
//! A Kafka consumer lag check and metrics emitter built on Kafka's own
//! command-line tools.
//!
//! lagwatch runs `kafka-consumer-groups.sh` (or the legacy
//! `ConsumerOffsetChecker` for ZooKeeper-coordinated groups), parses the
//! per-partition table it prints, sums offsets, log sizes and lag per topic,
//! and then either evaluates the result against warning/critical bounds or
//! emits it as graphite metrics.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                             App                                │
//! │  ┌──────────┐   ┌─────────┐   ┌───────────┐   ┌─────────────┐  │
//! │  │  runner  │──▶│ parser  │──▶│ aggregate │──▶│ thresholds  │──▶ Verdict
//! │  │ (source) │   │         │   │           │   └─────────────┘  │
//! │  └──────────┘   └─────────┘   │           │   ┌─────────────┐  │
//! │                               │           │──▶│  metrics    │──▶ MetricPoints
//! │                               └───────────┘   └─────────────┘  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Wires settings, the command runner and the data pipeline
//! - **[`data`]**: Record parser, topic aggregator, threshold evaluator and
//!   metrics projector
//! - **[`config`]**: Layered [`Settings`] (defaults, file, environment, flags)
//! - **[`output`]**: Plugin-style text and JSON rendering
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Alert when any topic lags by more than 5000 messages
//! lagwatch check --group billing --critical-over 5000 --warning-over 1000
//!
//! # Emit graphite metrics
//! lagwatch metrics --group billing --scheme kafka.consumers
//!
//! # Evaluate previously captured tool output
//! lagwatch --input describe.txt check --group billing
//! ```
//!
//! ### As a library
//!
//! ```
//! use lagwatch::data::{RecordParser, Layout, TopicTable, ThresholdEvaluator, Thresholds};
//! use lagwatch_types::Status;
//!
//! let output = "\
//! Group Topic Pid Offset logSize Lag Owner
//! billing invoices 0 100 110 10 billing_host-1
//! ";
//!
//! let records = RecordParser::for_layout(Layout::LegacyOffsetChecker).parse(output);
//! let table = TopicTable::aggregate(records);
//!
//! let evaluation = ThresholdEvaluator::new("billing", Thresholds::default())
//!     .evaluate(&table)
//!     .unwrap();
//! assert_eq!(evaluation.verdict.status, Status::Ok);
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod output;

pub use app::App;
pub use config::{Overrides, Settings};
pub use data::{
    Layout, MetricsProjector, RecordParser, ThresholdEvaluator, Thresholds, TopicFilter, TopicTable,
};
pub use error::CheckError;
pub use output::Format;
