use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use lagwatch::output::{self, Format};
use lagwatch::{App, CheckError, Overrides, Settings};
use lagwatch_adapters::{CommandRunner, FileRunner, ProcessRunner};
use lagwatch_types::{Status, Verdict};

#[derive(Parser, Debug)]
#[command(name = "lagwatch")]
#[command(about = "Kafka consumer lag check and metrics from Kafka's command-line tools")]
struct Cli {
    /// Settings file (TOML, YAML or JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read captured consumer group output from a file instead of running Kafka's tools
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    /// Increase log verbosity (-v debug, -vv trace); logs go to stderr
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Check consumer lag against warning/critical bounds
    Check(CheckArgs),
    /// Emit offset, logsize and lag metrics per topic
    Metrics(MetricsArgs),
}

#[derive(Args, Debug)]
struct ClusterArgs {
    /// Consumer group
    #[arg(short, long)]
    group: Option<String>,

    /// Kafka installation directory
    #[arg(short, long)]
    kafka_home: Option<PathBuf>,

    /// ZooKeeper connect string
    #[arg(short, long)]
    zookeeper: Option<String>,

    /// Bootstrap server
    #[arg(short, long)]
    bootstrap_server: Option<String>,

    /// Whether the group uses the new consumer protocol
    #[arg(short, long, value_name = "BOOL")]
    new_consumer: Option<bool>,

    /// Comma-separated topics to report
    #[arg(short, long = "topic", value_delimiter = ',')]
    topics: Option<Vec<String>>,

    /// Comma-separated topics to leave out
    #[arg(short = 'e', long, value_delimiter = ',')]
    topic_excludes: Option<Vec<String>>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[command(flatten)]
    cluster: ClusterArgs,

    /// List topics before describing a legacy group
    #[arg(short, long, value_name = "BOOL")]
    auto_list: Option<bool>,

    /// Warning if the highest topic lag is over this value
    #[arg(short = 'W', long)]
    warning_over: Option<i64>,

    /// Critical if the highest topic lag is over this value
    #[arg(short = 'C', long)]
    critical_over: Option<i64>,

    /// Warning if the lowest topic lag is under this value
    #[arg(short = 'w', long)]
    warning_under: Option<i64>,

    /// Critical if the lowest topic lag is under this value
    #[arg(short = 'c', long)]
    critical_under: Option<i64>,
}

#[derive(Args, Debug)]
struct MetricsArgs {
    #[command(flatten)]
    cluster: ClusterArgs,

    /// Metric naming scheme, prepended to every metric
    #[arg(short, long)]
    scheme: Option<String>,
}

impl ClusterArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            group: self.group.clone(),
            kafka_home: self.kafka_home.clone(),
            zookeeper: self.zookeeper.clone(),
            bootstrap_server: self.bootstrap_server.clone(),
            new_consumer: self.new_consumer,
            topics: self.topics.clone(),
            topic_excludes: self.topic_excludes.clone(),
            ..Overrides::default()
        }
    }
}

impl Mode {
    fn overrides(&self) -> Overrides {
        match self {
            Mode::Check(args) => Overrides {
                auto_list: args.auto_list,
                warning_over: args.warning_over,
                critical_over: args.critical_over,
                warning_under: args.warning_under,
                critical_under: args.critical_under,
                ..args.cluster.overrides()
            },
            Mode::Metrics(args) => Overrides {
                scheme: args.scheme.clone(),
                ..args.cluster.overrides()
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let status = run(&cli)?;
    std::process::exit(status.exit_code());
}

/// Execute the selected mode and return the status to exit with.
fn run(cli: &Cli) -> Result<Status> {
    let mut stdout = io::stdout().lock();

    let settings = match Settings::load(cli.config.as_deref(), &cli.mode.overrides()) {
        Ok(settings) => settings,
        Err(e) => {
            let verdict = failure_verdict(&cli.mode, &CheckError::from(e));
            output::write_verdict(&mut stdout, &verdict, cli.format)?;
            return Ok(verdict.status);
        }
    };
    debug!(?settings, "resolved settings");

    let runner: Box<dyn CommandRunner> = match &cli.input {
        Some(path) => Box::new(FileRunner::new(path)),
        None => Box::new(ProcessRunner::new()),
    };
    let app = App::new(settings, runner);

    let status = match cli.mode {
        Mode::Check(_) => {
            let verdict = app.check();
            output::write_verdict(&mut stdout, &verdict, cli.format)?;
            verdict.status
        }
        Mode::Metrics(_) => match app.metrics() {
            Ok(points) => {
                output::write_points(&mut stdout, &points, cli.format)?;
                Status::Ok
            }
            Err(e) => {
                let verdict = failure_verdict(&cli.mode, &e);
                output::write_verdict(&mut stdout, &verdict, cli.format)?;
                verdict.status
            }
        },
    };

    stdout.flush()?;
    Ok(status)
}

/// Verdict reported when a run fails before producing a result.
///
/// Metrics mode has no verdict of its own, so its failures carry an `Error:`
/// prefix; check mode reports the error as the check message.
fn failure_verdict(mode: &Mode, error: &CheckError) -> Verdict {
    let message = match mode {
        Mode::Check(_) => error.to_string(),
        Mode::Metrics(_) => format!("Error: {}", error),
    };
    Verdict::new(error.status(), message)
}

/// Log to stderr so stdout carries only the verdict or metric lines.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
