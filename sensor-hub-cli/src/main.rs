// Sensor Hub CLI - Command-line front end
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Sensor Hub CLI
//!
//! Listens to a sensor board over a serial port (or replays a captured log)
//! and processes the readings it reports.
//!
//! ## Usage
//!
//! ```bash
//! # Listen to a board until Ctrl-C
//! sensor-hub listen --port /dev/ttyACM0 --baud 9600
//!
//! # Replay a captured log and print the result as JSON
//! sensor-hub listen --file capture.log --json
//!
//! # Interactive menu
//! sensor-hub shell
//! ```

mod error;
mod listen;
mod shell;
mod source;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args as ClapArgs, Parser, Subcommand};
use sensor_hub::{ClassifierConfig, IngestConfig, SensorRegistry, DEFAULT_BAUD_RATE};
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use error::CliError;
use listen::ListenGate;
use shell::{Listener, Shell};
use source::SourceSpec;

/// Sensor Hub command-line interface
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest readings from a serial port, a file or standard input
    Listen(ListenArgs),
    /// Interactive menu
    Shell(SerialArgs),
    /// List available serial ports
    Ports,
}

/// Serial line settings
#[derive(ClapArgs, Debug, Clone)]
struct SerialArgs {
    /// Serial speed in baud
    #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE)]
    baud: u32,

    /// Serial read timeout in milliseconds
    #[arg(long, default_value = "250")]
    timeout_ms: u64,

    /// Pause after opening the port, for boards that reset on connect
    #[arg(long, default_value = "2000")]
    settle_ms: u64,

    /// Ignore lines containing this text (repeatable, replaces the defaults)
    #[arg(long = "ignore", value_name = "TEXT")]
    ignore: Vec<String>,

    /// Stop after this many lines
    #[arg(long)]
    max_lines: Option<u64>,
}

impl SerialArgs {
    fn ingest_config(&self) -> IngestConfig {
        let classifier = if self.ignore.is_empty() {
            ClassifierConfig::default()
        } else {
            ClassifierConfig::with_ignore_patterns(self.ignore.iter().cloned())
        };
        IngestConfig {
            classifier,
            max_lines: self.max_lines,
        }
    }
}

#[derive(ClapArgs, Debug)]
struct ListenArgs {
    /// Serial device (e.g. /dev/ttyACM0, COM3)
    #[arg(short, long, conflicts_with = "file")]
    port: Option<String>,

    /// Captured log to replay instead of a device
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Print the final snapshots as JSON
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    serial: SerialArgs,
}

impl ListenArgs {
    fn source(&self) -> SourceSpec {
        match (&self.port, &self.file) {
            (Some(port), _) => SourceSpec::Serial {
                port: port.clone(),
                baud: self.serial.baud,
                timeout: Duration::from_millis(self.serial.timeout_ms),
                settle: Duration::from_millis(self.serial.settle_ms),
            },
            (None, Some(path)) => SourceSpec::File(path.clone()),
            (None, None) => SourceSpec::Stdin,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
        EnvFilter::from_default_env().add_directive(level.into())
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Sensor Hub v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(args.command).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Listen(args) => run_listen(args).await,
        Command::Shell(serial) => run_shell(serial).await,
        Command::Ports => source::list_ports(),
    }
}

async fn run_listen(args: ListenArgs) -> Result<(), CliError> {
    let (mut registry, result) =
        listen::listen(args.source(), SensorRegistry::new(), args.serial.ingest_config()).await;

    // Print whatever was collected, even after a transport failure
    if args.json {
        println!("{}", serde_json::to_string_pretty(&registry.snapshots())?);
    } else {
        println!();
        println!("=== Processing ({} sensors) ===", registry.len());
        for snapshot in registry.snapshots() {
            println!("{}", snapshot);
        }
    }

    let report = result?;
    info!(
        "{} lines: {} accepted, {} ignored, {} malformed, {} rejected",
        report.stats.lines,
        report.stats.accepted,
        report.stats.ignored,
        report.stats.malformed,
        report.stats.rejected
    );

    registry.teardown();
    Ok(())
}

async fn run_shell(serial: SerialArgs) -> Result<(), CliError> {
    let listener = Listener {
        handle: tokio::runtime::Handle::current(),
        baud: serial.baud,
        timeout: Duration::from_millis(serial.timeout_ms),
        settle: Duration::from_millis(serial.settle_ms),
        ingest: serial.ingest_config(),
        gate: ListenGate::default(),
    };
    tokio::spawn(listen::exit_on_idle_interrupt(listener.gate.clone()));

    let released = tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        Shell::new(stdin.lock(), std::io::stdout())
            .with_listener(listener)
            .run()
    })
    .await??;

    info!("Shell closed, {} sensors released", released);
    Ok(())
}
