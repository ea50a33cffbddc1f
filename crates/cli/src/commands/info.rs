//! `info` command implementation.

use anyhow::{Context, Result};
use tracing::info;

use config_loader::ConfigLoader;
use contracts::{LookupOrder, SchedulerBlueprint};

use crate::cli::InfoArgs;

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let json = ConfigLoader::to_json(&blueprint).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint);
    }

    Ok(())
}

fn print_config_info(blueprint: &SchedulerBlueprint) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              Service Scheduler Configuration                 ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("🌐 Server");
    println!("   ├─ Version: {:?}", blueprint.version);
    println!(
        "   └─ Listen: {}:{}",
        blueprint.server.host, blueprint.server.port
    );

    let policy = &blueprint.policy;
    println!("\n⚙️  Policy");
    println!("   ├─ Mode: {:?}", policy.mode);
    println!(
        "   ├─ Ratio Threshold: {} HIGH in a row while NORMAL waits",
        policy.ratio_threshold
    );
    println!("   ├─ Lookup Order: {}", describe_lookup_order(policy.lookup_order));
    println!("   └─ Actor Capacity: {}", policy.actor_capacity);

    let observability = &blueprint.observability;
    println!("\n📈 Observability");
    println!("   ├─ Log Format: {:?}", observability.log_format);
    println!("   ├─ Log Level: {}", observability.default_log_level);
    match observability.metrics_port {
        Some(port) => println!("   └─ Metrics: 0.0.0.0:{}", port),
        None => println!("   └─ Metrics: disabled"),
    }

    println!();
}

fn describe_lookup_order(order: LookupOrder) -> &'static str {
    match order {
        LookupOrder::NormalFirst => "NORMAL queue, then HIGH",
        LookupOrder::HighFirst => "HIGH queue, then NORMAL",
    }
}
