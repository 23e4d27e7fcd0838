//! Commands for Kafka's administration scripts.
//!
//! Three invocations are supported:
//!
//! - `kafka-consumer-groups.sh --describe` for groups using the new
//!   (broker-coordinated) consumer protocol
//! - `kafka-run-class.sh kafka.tools.ConsumerOffsetChecker` for legacy
//!   ZooKeeper-coordinated groups
//! - `kafka-run-class.sh kafka.admin.TopicCommand --list` to enumerate topics

use std::fmt;
use std::path::{Path, PathBuf};

/// What a command produces, used by runners that replay captured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Per-partition offsets of a consumer group.
    DescribeGroup,
    /// One topic name per line.
    ListTopics,
}

/// A fully resolved command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KafkaCommand {
    pub kind: CommandKind,
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl KafkaCommand {
    fn new(kind: CommandKind, program: PathBuf) -> Self {
        Self {
            kind,
            program,
            args: Vec::new(),
        }
    }

    fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for KafkaCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Locates Kafka's scripts and builds commands against one cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KafkaTools {
    kafka_home: PathBuf,
    zookeeper: String,
    bootstrap_server: String,
}

impl KafkaTools {
    /// Create a new builder for configuring the tools.
    pub fn builder() -> KafkaToolsBuilder {
        KafkaToolsBuilder::default()
    }

    /// Kafka installation directory.
    pub fn kafka_home(&self) -> &Path {
        &self.kafka_home
    }

    /// Path of `kafka-run-class.sh`.
    pub fn run_class_script(&self) -> PathBuf {
        self.kafka_home.join("bin").join("kafka-run-class.sh")
    }

    /// Path of `kafka-consumer-groups.sh`.
    pub fn consumer_groups_script(&self) -> PathBuf {
        self.kafka_home.join("bin").join("kafka-consumer-groups.sh")
    }

    /// Describe the partitions of `group`.
    ///
    /// With `new_consumer` the consumer-groups script is queried through the
    /// bootstrap server. Otherwise the legacy offset checker is queried
    /// through ZooKeeper, restricted to `topics` when any are given.
    pub fn describe_group(&self, group: &str, new_consumer: bool, topics: &[String]) -> KafkaCommand {
        if new_consumer {
            KafkaCommand::new(CommandKind::DescribeGroup, self.consumer_groups_script())
                .arg("--group")
                .arg(group)
                .arg("--bootstrap-server")
                .arg(&self.bootstrap_server)
                .arg("--describe")
        } else {
            let command = KafkaCommand::new(CommandKind::DescribeGroup, self.run_class_script())
                .arg("kafka.tools.ConsumerOffsetChecker")
                .arg("--group")
                .arg(group)
                .arg("--zookeeper")
                .arg(&self.zookeeper);
            if topics.is_empty() {
                command
            } else {
                command.arg("--topic").arg(topics.join(","))
            }
        }
    }

    /// List every topic known to ZooKeeper.
    pub fn list_topics(&self) -> KafkaCommand {
        KafkaCommand::new(CommandKind::ListTopics, self.run_class_script())
            .arg("kafka.admin.TopicCommand")
            .arg("--zookeeper")
            .arg(&self.zookeeper)
            .arg("--list")
    }
}

impl Default for KafkaTools {
    fn default() -> Self {
        KafkaToolsBuilder::default().build()
    }
}

/// Builder for KafkaTools.
#[derive(Debug, Default)]
pub struct KafkaToolsBuilder {
    kafka_home: Option<PathBuf>,
    zookeeper: Option<String>,
    bootstrap_server: Option<String>,
}

impl KafkaToolsBuilder {
    /// Set the Kafka installation directory (default: `/opt/kafka`).
    pub fn kafka_home(mut self, path: impl Into<PathBuf>) -> Self {
        self.kafka_home = Some(path.into());
        self
    }

    /// Set the ZooKeeper connect string (default: `localhost:2181`).
    pub fn zookeeper(mut self, zookeeper: impl Into<String>) -> Self {
        self.zookeeper = Some(zookeeper.into());
        self
    }

    /// Set the bootstrap server (default: `localhost:9092`).
    pub fn bootstrap_server(mut self, server: impl Into<String>) -> Self {
        self.bootstrap_server = Some(server.into());
        self
    }

    /// Build the tools.
    pub fn build(self) -> KafkaTools {
        KafkaTools {
            kafka_home: self.kafka_home.unwrap_or_else(|| PathBuf::from("/opt/kafka")),
            zookeeper: self
                .zookeeper
                .unwrap_or_else(|| "localhost:2181".to_string()),
            bootstrap_server: self
                .bootstrap_server
                .unwrap_or_else(|| "localhost:9092".to_string()),
        }
    }
}
