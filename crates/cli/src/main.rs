//! # tof-sim CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - One-shot packet generation and demodulation
//! - Fixed-rate streaming with graceful shutdown
//! - Range characterization reports
//! - Configuration validation

mod cli;
mod commands;
mod error;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_characterize, run_demodulate, run_generate, run_stream, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "tof-sim starting");

    let result = match &cli.command {
        Commands::Generate(args) => run_generate(args),
        Commands::Demodulate(args) => run_demodulate(args),
        Commands::Stream(args) => run_stream(args).await,
        Commands::Characterize(args) => run_characterize(args),
        Commands::Validate(args) => run_validate(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
///
/// The metrics endpoint is installed later by the commands that serve it.
fn init_logging(cli: &Cli) -> Result<()> {
    let config = ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: None,
        quiet: cli.quiet,
        ..Default::default()
    }
    .with_verbosity(cli.verbose);

    observability::init_with_config(config)
}
