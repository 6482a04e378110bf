//! hottrack - command-line inspector for the hot-tracking engine
//!
//! Provides commands for:
//! - Rendering a `HeatReport` snapshot for a file
//! - Printing aggregate size-account and bucket-occupancy figures
//! - Validating a `HotTrackConfig` file

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::config::ConfigCommand;
use commands::report::ReportCommand;
use commands::stats::StatsCommand;
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "hottrack", version, about = "Inspect the hot-tracking engine")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print a HeatReport snapshot for one tracked file
    Report(ReportCommand),
    /// Print aggregate size-account and bucket-occupancy figures
    Stats(StatsCommand),
    /// Validate a HotTrackConfig file
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    match cli.command {
        Commands::Report(cmd) => cmd.execute(format),
        Commands::Stats(cmd) => cmd.execute(format),
        Commands::Config(cmd) => cmd.execute(format),
    }
}
