//! # Service Scheduler CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Configuration loading and validation
//! - HTTP serving of the dispatcher
//! - Graceful shutdown handling

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_info, run_serve, run_validate};
use contracts::ObservabilitySettings;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // `serve` initializes logging itself once its configuration is loaded
    let result = match &cli.command {
        Commands::Serve(args) => run_serve(&cli, args).await,
        Commands::Validate(args) => {
            init_logging(&cli, &ObservabilitySettings::default())?;
            run_validate(args)
        }
        Commands::Info(args) => {
            init_logging(&cli, &ObservabilitySettings::default())?;
            run_info(args)
        }
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Settings after applying `-q`, `-v` and `--log-format` to the configured ones
pub(crate) fn effective_observability(
    cli: &Cli,
    configured: &ObservabilitySettings,
) -> ObservabilitySettings {
    let mut settings = configured.clone();
    if cli.quiet {
        settings.default_log_level = "warn".to_string();
    } else if cli.verbose > 0 {
        let level = if cli.verbose == 1 { "debug" } else { "trace" };
        settings.default_log_level = level.to_string();
    }
    if let Some(format) = cli.log_format {
        settings.log_format = format.into();
    }
    settings
}

/// Initialize logging (and metrics, when a port is set) from CLI options over configured settings
pub(crate) fn init_logging(cli: &Cli, configured: &ObservabilitySettings) -> Result<()> {
    observability::init_with_config(&effective_observability(cli, configured))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Service Scheduler CLI starting"
    );
    Ok(())
}
