//! # lagwatch-adapters
//!
//! The boundary between lagwatch and Kafka's command-line tools.
//!
//! lagwatch never talks to brokers or ZooKeeper itself. Instead it runs the
//! administration scripts shipped with Kafka and scrapes their output. This
//! crate builds those commands ([`KafkaTools`]) and executes them behind the
//! [`CommandRunner`] trait, so the parsing pipeline can be driven from a live
//! installation ([`ProcessRunner`]), a captured output file ([`FileRunner`])
//! or literal text in tests ([`StaticRunner`]).
//!
//! ## Example
//!
//! ```rust,no_run
//! use lagwatch_adapters::{CommandRunner, KafkaTools, ProcessRunner};
//!
//! let tools = KafkaTools::builder()
//!     .kafka_home("/opt/kafka")
//!     .bootstrap_server("localhost:9092")
//!     .build();
//!
//! let command = tools.describe_group("my-group", true, &[]);
//! let output = ProcessRunner::new().run(&command)?;
//! println!("{output}");
//! # Ok::<(), lagwatch_adapters::AdapterError>(())
//! ```

pub mod error;
pub mod kafka;
pub mod runner;

pub use error::AdapterError;
pub use kafka::{CommandKind, KafkaCommand, KafkaTools, KafkaToolsBuilder};
pub use runner::{CommandRunner, FileRunner, ProcessRunner, StaticRunner};
