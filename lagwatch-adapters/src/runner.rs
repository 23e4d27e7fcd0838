//! Command runner abstraction.
//!
//! A [`CommandRunner`] turns a [`KafkaCommand`] into the raw text the tool
//! printed. Implementations never interpret that text.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::{AdapterError, CommandKind, KafkaCommand};

/// Trait for obtaining the output of a Kafka administration command.
///
/// # Example
///
/// ```
/// use lagwatch_adapters::{CommandKind, CommandRunner, KafkaTools, StaticRunner};
///
/// let runner = StaticRunner::new().with_output(CommandKind::ListTopics, "orders\n");
/// let output = runner.run(&KafkaTools::default().list_topics()).unwrap();
/// assert_eq!(output, "orders\n");
/// ```
pub trait CommandRunner: Debug {
    /// Run `command` and return its combined standard output and error.
    fn run(&self, command: &KafkaCommand) -> Result<String, AdapterError>;

    /// Returns a human-readable description of the runner.
    fn description(&self) -> &str;
}

impl<T: CommandRunner + ?Sized> CommandRunner for Rc<T> {
    fn run(&self, command: &KafkaCommand) -> Result<String, AdapterError> {
        (**self).run(command)
    }

    fn description(&self) -> &str {
        (**self).description()
    }
}

/// Runs commands as child processes.
///
/// Standard output and standard error share one pipe, so the returned text
/// keeps lines in the order the tool wrote them. A non-zero exit status is
/// logged but not treated as an error; the diagnostics are in the output.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &KafkaCommand) -> Result<String, AdapterError> {
        if !command.program.exists() {
            return Err(AdapterError::ToolNotFound(command.program.clone()));
        }

        debug!(command = %command, "running kafka tool");

        let spawn_error = |source: io::Error| AdapterError::Spawn {
            program: command.program.display().to_string(),
            source,
        };
        let capture_error = |source: io::Error| AdapterError::Capture {
            program: command.program.display().to_string(),
            source,
        };

        let (mut reader, writer) = os_pipe::pipe().map_err(spawn_error)?;
        let stderr_writer = writer.try_clone().map_err(spawn_error)?;

        let mut process = Command::new(&command.program);
        process.args(&command.args).stdout(writer).stderr(stderr_writer);
        let mut child = process.spawn().map_err(spawn_error)?;
        // The command still holds the write ends; drop them so the read sees EOF.
        drop(process);

        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(capture_error)?;
        let status = child.wait().map_err(capture_error)?;

        if !status.success() {
            warn!(command = %command, status = %status, "kafka tool exited unsuccessfully");
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn description(&self) -> &str {
        "process"
    }
}

/// Replays previously captured consumer group output from a file.
///
/// Group descriptions come from the file; topic listings are empty, so no
/// topic restriction is derived from them.
#[derive(Debug)]
pub struct FileRunner {
    path: PathBuf,
    description: String,
}

impl FileRunner {
    /// Create a runner replaying the file at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }
}

impl CommandRunner for FileRunner {
    fn run(&self, command: &KafkaCommand) -> Result<String, AdapterError> {
        match command.kind {
            CommandKind::DescribeGroup => {
                debug!(path = %self.path.display(), "replaying captured output");
                fs::read_to_string(&self.path).map_err(|source| AdapterError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
            CommandKind::ListTopics => Ok(String::new()),
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Returns canned output per command kind and records every command run.
///
/// Commands without canned output produce an empty string.
#[derive(Debug, Default)]
pub struct StaticRunner {
    outputs: HashMap<CommandKind, String>,
    history: RefCell<Vec<KafkaCommand>>,
}

impl StaticRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output returned for commands of `kind`.
    pub fn with_output(mut self, kind: CommandKind, output: impl Into<String>) -> Self {
        self.outputs.insert(kind, output.into());
        self
    }

    /// Commands run so far, oldest first.
    pub fn history(&self) -> Vec<KafkaCommand> {
        self.history.borrow().clone()
    }
}

impl CommandRunner for StaticRunner {
    fn run(&self, command: &KafkaCommand) -> Result<String, AdapterError> {
        self.history.borrow_mut().push(command.clone());
        Ok(self.outputs.get(&command.kind).cloned().unwrap_or_default())
    }

    fn description(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KafkaTools;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn process_runner_reports_missing_tool() {
        let tools = KafkaTools::builder().kafka_home("/nonexistent/kafka").build();
        let err = ProcessRunner::new()
            .run(&tools.describe_group("g", true, &[]))
            .unwrap_err();

        assert!(err.is_precondition());
        assert_eq!(
            err.to_string(),
            "Can not find /nonexistent/kafka/bin/kafka-consumer-groups.sh"
        );
    }

    #[cfg(unix)]
    fn shell(script: &str) -> KafkaCommand {
        KafkaCommand {
            kind: CommandKind::ListTopics,
            program: PathBuf::from("/bin/sh"),
            args: vec!["-c".to_string(), script.to_string()],
        }
    }

    #[cfg(unix)]
    #[test]
    fn process_runner_combines_stdout_and_stderr() {
        let output = ProcessRunner::new().run(&shell("echo out; echo err 1>&2")).unwrap();
        assert_eq!(output, "out\nerr\n");
    }

    #[cfg(unix)]
    #[test]
    fn process_runner_keeps_write_order_across_streams() {
        let script = "echo 'SLF4J: first' 1>&2; echo banner; echo 'SLF4J: second' 1>&2; echo row";
        let output = ProcessRunner::new().run(&shell(script)).unwrap();
        assert_eq!(output, "SLF4J: first\nbanner\nSLF4J: second\nrow\n");
    }

    #[cfg(unix)]
    #[test]
    fn process_runner_returns_output_of_failing_tool() {
        let output = ProcessRunner::new().run(&shell("echo 'Error: no such group' 1>&2; exit 1")).unwrap();
        assert_eq!(output, "Error: no such group\n");
    }

    #[test]
    fn file_runner_replays_describe_output() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "t1 0 10 10 0 consumer-1").unwrap();

        let runner = FileRunner::new(file.path());
        let tools = KafkaTools::default();

        let output = runner.run(&tools.describe_group("g", true, &[])).unwrap();
        assert_eq!(output, "t1 0 10 10 0 consumer-1\n");
        assert_eq!(runner.run(&tools.list_topics()).unwrap(), "");
        assert!(runner.description().starts_with("file: "));
    }

    #[test]
    fn file_runner_missing_file() {
        let runner = FileRunner::new("/nonexistent/path/describe.txt");
        let err = runner
            .run(&KafkaTools::default().describe_group("g", true, &[]))
            .unwrap_err();

        assert!(err.is_precondition());
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn static_runner_records_history() {
        let runner = StaticRunner::new().with_output(CommandKind::DescribeGroup, "data");
        let tools = KafkaTools::default();

        assert_eq!(runner.run(&tools.list_topics()).unwrap(), "");
        assert_eq!(runner.run(&tools.describe_group("g", false, &[])).unwrap(), "data");

        let kinds: Vec<_> = runner.history().iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![CommandKind::ListTopics, CommandKind::DescribeGroup]);
    }
}
