//! Error types for the check and metrics pipelines.

use thiserror::Error;

use lagwatch_adapters::AdapterError;
use lagwatch_types::Status;

use crate::config::ConfigError;
use crate::data::Violation;

/// Errors that end a run without a verdict from the thresholds.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The tool output contained no partition rows.
    #[error("Could not find topics/partitions")]
    NoTopics,

    /// Partitions with negative figures or without an owner.
    #[error("{}", join_violations(.0))]
    Integrity(Vec<Violation>),

    /// The Kafka tool could not be run or its output could not be read.
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// Settings are missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CheckError {
    /// Severity to report for this error.
    ///
    /// Problems with the environment are `Unknown`; problems found in, or
    /// while fetching, the consumer group data are `Critical`.
    pub fn status(&self) -> Status {
        match self {
            CheckError::NoTopics | CheckError::Integrity(_) => Status::Critical,
            CheckError::Adapter(e) if e.is_precondition() => Status::Unknown,
            CheckError::Adapter(_) => Status::Critical,
            CheckError::Config(_) => Status::Unknown,
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
