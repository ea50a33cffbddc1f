//! `serve` command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use api::AppState;
use config_loader::ConfigLoader;
use contracts::{ObservabilitySettings, SchedulerBlueprint};

use crate::cli::{Cli, ServeArgs};

/// Execute the `serve` command
pub async fn run_serve(cli: &Cli, args: &ServeArgs) -> Result<()> {
    let blueprint = load_blueprint(args)?;

    crate::init_logging(cli, &startup_observability(&blueprint, args))?;
    info!(
        config = ?args.config,
        host = %blueprint.server.host,
        port = blueprint.server.port,
        mode = ?blueprint.policy.mode,
        ratio_threshold = blueprint.policy.ratio_threshold,
        lookup_order = ?blueprint.policy.lookup_order,
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    let dispatcher = dispatcher::create_dispatcher(&blueprint.policy);
    let state = Arc::new(AppState::from_dispatcher(dispatcher, blueprint.policy));

    info!("Starting scheduler...");
    api::start_server(&blueprint.server, Arc::clone(&state), shutdown_signal())
        .await
        .with_context(|| {
            format!(
                "HTTP server failed on {}:{}",
                blueprint.server.host, blueprint.server.port
            )
        })?;

    let snapshot = state.metrics.snapshot();
    info!(
        checked_in_high = snapshot.checked_in_high,
        checked_in_normal = snapshot.checked_in_normal,
        served_high = snapshot.served_high,
        served_normal = snapshot.served_normal,
        "Scheduler statistics"
    );

    state.queue.shutdown().await;

    info!("Service Scheduler finished");
    Ok(())
}

/// Load the configuration file (or defaults) and apply CLI overrides
fn load_blueprint(args: &ServeArgs) -> Result<SchedulerBlueprint> {
    let mut blueprint = match &args.config {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Configuration file not found: {}", path.display());
            }
            ConfigLoader::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => SchedulerBlueprint::default(),
    };

    apply_overrides(&mut blueprint, args);

    ConfigLoader::validate(&blueprint).context("Invalid configuration after CLI overrides")?;
    Ok(blueprint)
}

/// Observability settings to start with; a dry run never opens the metrics listener
fn startup_observability(blueprint: &SchedulerBlueprint, args: &ServeArgs) -> ObservabilitySettings {
    let mut settings = blueprint.observability.clone();
    if args.dry_run {
        settings.metrics_port = None;
    }
    settings
}

fn apply_overrides(blueprint: &mut SchedulerBlueprint, args: &ServeArgs) {
    if let Some(ref host) = args.host {
        blueprint.server.host = host.clone();
    }
    if let Some(port) = args.port {
        blueprint.server.port = port;
    }
    if let Some(port) = args.metrics_port {
        blueprint.observability.metrics_port = (port != 0).then_some(port);
    }
    if let Some(mode) = args.mode {
        blueprint.policy.mode = mode.into();
    }
    if let Some(threshold) = args.ratio_threshold {
        blueprint.policy.ratio_threshold = threshold;
    }
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    warn!("Received shutdown signal, stopping scheduler...");
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &SchedulerBlueprint) {
    println!("\n=== Configuration Summary ===\n");
    println!("Server:");
    println!("  Listen: {}:{}", blueprint.server.host, blueprint.server.port);
    println!("\nPolicy:");
    println!("  Mode: {:?}", blueprint.policy.mode);
    println!("  Ratio threshold: {}", blueprint.policy.ratio_threshold);
    println!("  Lookup order: {:?}", blueprint.policy.lookup_order);
    match blueprint.observability.metrics_port {
        Some(port) => println!("\nMetrics: 0.0.0.0:{port}"),
        None => println!("\nMetrics: disabled"),
    }
    println!();
}
