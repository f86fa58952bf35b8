//! linereport - one line per test case
//!
//! CLI entry point: replays a newline-delimited JSON event stream through
//! the line formatter and prints the report to stdout.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use linereport::{replay, ConfigOverrides, FormatterConfig, LineFormatter, WriterSink};

/// Report test results one line per test case
///
/// Reads run events (one JSON object per line) from a file or stdin and
/// prints an aligned line for each completed test.
#[derive(Parser, Debug)]
#[command(name = "linereport", version, about)]
struct Cli {
    /// Path to a linereport.toml configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read events from this file instead of stdin
    #[arg(long)]
    input: Option<PathBuf>,

    /// Name of the test engine producing the events
    #[arg(long, default_value = "jasmine")]
    engine: String,

    /// Colorize the status column
    #[arg(long)]
    color: bool,

    /// Hide disabled tests and summarize them at the end
    #[arg(long)]
    hide_disabled: bool,

    /// Hide pending tests and summarize them at the end
    #[arg(long)]
    hide_pending: bool,

    /// Print stack traces beneath failure messages
    #[arg(long)]
    show_stack_trace: bool,

    /// Increase diagnostic output on stderr (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Diagnostic level for the `-v` count, overridden by `RUST_LOG`.
const fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("linereport={}", log_level(verbose))));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Layer command line flags over the overrides read from the config file.
///
/// Flags only ever switch features on.
fn apply_flags(cli: &Cli, mut overrides: ConfigOverrides) -> ConfigOverrides {
    if cli.color {
        overrides.color = Some(true);
    }
    if cli.hide_disabled {
        overrides.hide_disabled_specs = Some(true);
    }
    if cli.hide_pending {
        overrides.hide_pending_specs = Some(true);
    }
    if cli.show_stack_trace {
        overrides.show_stack_trace = Some(true);
    }
    overrides
}

fn load_config(cli: &Cli) -> Result<FormatterConfig> {
    let overrides = match &cli.config {
        Some(path) => ConfigOverrides::from_path(path)?,
        None => ConfigOverrides::default(),
    };
    Ok(FormatterConfig::default().with_overrides(apply_flags(cli, overrides)))
}

fn open_input(cli: &Cli) -> Result<Box<dyn BufRead>> {
    match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open event file: {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    let input = open_input(&cli)?;

    let sink = WriterSink::new(BufWriter::new(io::stdout().lock()));
    let mut formatter = LineFormatter::new(cli.engine.as_str(), config, sink);

    let events = replay(input, &mut formatter)?;
    formatter
        .sink_mut()
        .flush()
        .context("Failed to flush report output")?;
    tracing::debug!(events, "Replay complete");

    Ok(())
}
