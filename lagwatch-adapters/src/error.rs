//! Error types for command runners.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while obtaining tool output.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The Kafka script to run does not exist.
    #[error("Can not find {}", .0.display())]
    ToolNotFound(PathBuf),

    /// The process could not be started.
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The output of a running process could not be collected.
    #[error("Failed to capture output of {program}: {source}")]
    Capture {
        program: String,
        #[source]
        source: io::Error,
    },

    /// A captured output file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AdapterError {
    /// Whether the error means the environment is misconfigured rather than
    /// the command failing at runtime.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            AdapterError::ToolNotFound(_) | AdapterError::Read { .. }
        )
    }
}
