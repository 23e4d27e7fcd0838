//! Settings for a single run.
//!
//! Settings are layered, lowest priority first:
//!
//! 1. built-in defaults
//! 2. an optional config file (TOML, YAML or JSON, chosen by extension)
//! 3. `LAGWATCH_*` environment variables
//! 4. command-line flags
//!
//! ```toml
//! group = "billing"
//! kafka_home = "/opt/kafka"
//! bootstrap_server = "broker-1:9092"
//! topic_excludes = ["billing.dlq"]
//!
//! [thresholds]
//! warning_over = 1000
//! critical_over = 5000
//! ```
//!
//! Environment variables use `__` to reach nested keys and commas for lists,
//! e.g. `LAGWATCH_THRESHOLDS__CRITICAL_OVER=5000` or
//! `LAGWATCH_TOPIC_EXCLUDES=a,b`.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, Map};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use lagwatch_adapters::KafkaTools;

use crate::data::{Layout, Thresholds, TopicFilter, DEFAULT_SCHEME};

/// Prefix of environment variables read into [`Settings`].
pub const ENV_PREFIX: &str = "LAGWATCH";

/// Errors raised while building [`Settings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    /// No consumer group was given.
    #[error("A consumer group is required (--group)")]
    MissingGroup,
}

/// Everything a check or metrics run needs, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Consumer group to inspect.
    #[serde(default)]
    pub group: String,
    /// Kafka installation directory holding `bin/`.
    pub kafka_home: PathBuf,
    /// ZooKeeper connect string for legacy groups and topic listing.
    pub zookeeper: String,
    /// Bootstrap server for groups on the new consumer protocol.
    pub bootstrap_server: String,
    /// Whether the group uses the new consumer protocol.
    pub new_consumer: bool,
    /// Whether to list topics before describing a legacy group.
    pub auto_list: bool,
    /// Only report these topics.
    #[serde(default)]
    pub topics: Option<Vec<String>>,
    /// Never report these topics.
    #[serde(default)]
    pub topic_excludes: Option<Vec<String>>,
    /// Lag bounds for the check.
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Metric name prefix.
    pub scheme: String,
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub group: Option<String>,
    pub kafka_home: Option<PathBuf>,
    pub zookeeper: Option<String>,
    pub bootstrap_server: Option<String>,
    pub new_consumer: Option<bool>,
    pub auto_list: Option<bool>,
    pub topics: Option<Vec<String>>,
    pub topic_excludes: Option<Vec<String>>,
    pub warning_over: Option<i64>,
    pub critical_over: Option<i64>,
    pub warning_under: Option<i64>,
    pub critical_under: Option<i64>,
    pub scheme: Option<String>,
}

impl Settings {
    /// Load settings from defaults, `file`, the process environment and
    /// `overrides`.
    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self, ConfigError> {
        Self::load_with_env(file, overrides, None)
    }

    /// Like [`Settings::load`], reading environment variables from `env`
    /// instead of the process environment when given.
    pub fn load_with_env(
        file: Option<&Path>,
        overrides: &Overrides,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("kafka_home", "/opt/kafka")?
            .set_default("zookeeper", "localhost:2181")?
            .set_default("bootstrap_server", "localhost:9092")?
            .set_default("new_consumer", true)?
            .set_default("auto_list", true)?
            .set_default("scheme", DEFAULT_SCHEME)?;

        if let Some(path) = file {
            debug!(path = %path.display(), "loading settings file");
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("topics")
                .with_list_parse_key("topic_excludes")
                .try_parsing(true)
                .source(env),
        );

        let settings: Settings = builder
            .set_override_option("group", overrides.group.clone())?
            .set_override_option(
                "kafka_home",
                overrides.kafka_home.as_ref().map(|p| p.display().to_string()),
            )?
            .set_override_option("zookeeper", overrides.zookeeper.clone())?
            .set_override_option("bootstrap_server", overrides.bootstrap_server.clone())?
            .set_override_option("new_consumer", overrides.new_consumer)?
            .set_override_option("auto_list", overrides.auto_list)?
            .set_override_option("topics", overrides.topics.clone())?
            .set_override_option("topic_excludes", overrides.topic_excludes.clone())?
            .set_override_option("thresholds.warning_over", overrides.warning_over)?
            .set_override_option("thresholds.critical_over", overrides.critical_over)?
            .set_override_option("thresholds.warning_under", overrides.warning_under)?
            .set_override_option("thresholds.critical_under", overrides.critical_under)?
            .set_override_option("scheme", overrides.scheme.clone())?
            .build()?
            .try_deserialize()?;

        settings.validate()
    }

    /// Reject settings a run cannot start with.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.group.trim().is_empty() {
            return Err(ConfigError::MissingGroup);
        }
        Ok(self)
    }

    /// Output layout of the tool describing the group.
    pub fn layout(&self) -> Layout {
        Layout::for_protocol(self.new_consumer)
    }

    /// Allow-list and exclude-list as a filter.
    pub fn topic_filter(&self) -> TopicFilter {
        let mut filter = TopicFilter::new();
        if let Some(topics) = &self.topics {
            filter = filter.allow(topics.iter().cloned());
        }
        if let Some(excludes) = &self.topic_excludes {
            filter = filter.exclude(excludes.iter().cloned());
        }
        filter
    }

    /// Kafka tool locations for this cluster.
    pub fn kafka_tools(&self) -> KafkaTools {
        KafkaTools::builder()
            .kafka_home(&self.kafka_home)
            .zookeeper(&self.zookeeper)
            .bootstrap_server(&self.bootstrap_server)
            .build()
    }
}
