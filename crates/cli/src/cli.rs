//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Service Scheduler - two-class customer queue with bounded HIGH priority
#[derive(Parser, Debug)]
#[command(
    name = "service-scheduler",
    author,
    version,
    about = "Two-class customer service scheduler",
    long_about = "A customer service scheduler with HIGH and NORMAL queues.\n\n\
                  Issues increasing service numbers at check-in, serves HIGH customers \n\
                  first but never more than the configured ratio in a row while NORMAL \n\
                  customers wait, and exposes the queue over HTTP."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SERVICE_SCHEDULER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format (defaults to the configured one, then pretty)
    #[arg(long, value_enum, global = true, env = "SERVICE_SCHEDULER_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the scheduler over HTTP
    Serve(ServeArgs),

    /// Validate configuration file without serving
    Validate(ValidateArgs),

    /// Display the effective configuration
    Info(InfoArgs),
}

/// Arguments for the `serve` command
#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// Path to configuration file (TOML or JSON); built-in defaults when omitted
    #[arg(short, long, env = "SERVICE_SCHEDULER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override HTTP listen host from configuration
    #[arg(long, env = "SERVICE_SCHEDULER_HOST")]
    pub host: Option<String>,

    /// Override HTTP listen port from configuration
    #[arg(long, env = "SERVICE_SCHEDULER_PORT")]
    pub port: Option<u16>,

    /// Override Prometheus metrics port (0 = disabled)
    #[arg(long, env = "SERVICE_SCHEDULER_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    /// Override the dispatcher front-end
    #[arg(long, value_enum)]
    pub mode: Option<DispatchMode>,

    /// Override how many HIGH customers may be served in a row while NORMAL ones wait
    #[arg(long)]
    pub ratio_threshold: Option<u32>,

    /// Validate configuration and exit without serving
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for contracts::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

/// Dispatcher front-end
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum DispatchMode {
    /// Shared queues behind a mutex
    Mutex,
    /// Queues owned by a worker task
    Actor,
}

impl From<DispatchMode> for contracts::DispatchMode {
    fn from(mode: DispatchMode) -> Self {
        match mode {
            DispatchMode::Mutex => Self::Mutex,
            DispatchMode::Actor => Self::Actor,
        }
    }
}
