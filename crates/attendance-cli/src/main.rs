//! `attendance`: badge-swipe attendance terminal.

use anyhow::{Context, Result};
use attendance_cli::{DemoScript, Terminal};
use attendance_core::{AttendanceConfig, CardId, ProviderKind};
use attendance_services::CapabilityProvider;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "attendance", version, about = "Badge-swipe attendance terminal")]
struct Args {
    /// JSON configuration file. Defaults apply when omitted.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Capability provider (simulated or host). Overrides the config file.
    #[arg(long)]
    provider: Option<ProviderKind>,

    /// Log level (env-filter syntax). `RUST_LOG` takes precedence.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Simulated provider: swipe the demo card every N seconds.
    #[arg(long)]
    demo_swipe_secs: Option<u64>,

    /// Simulated provider: card swiped by the demo.
    #[arg(long, default_value_t = 1_234_567)]
    demo_card: u32,

    /// Simulated provider: press the shutdown button after N seconds.
    #[arg(long)]
    demo_shutdown_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = match &args.config {
        Some(path) => AttendanceConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AttendanceConfig::default(),
    };
    if let Some(provider) = args.provider {
        config = config.provider(provider);
    }
    config.validate().context("invalid configuration")?;

    let demo = DemoScript {
        swipe_every: args.demo_swipe_secs.map(Duration::from_secs),
        card: CardId::new(args.demo_card)?,
        shutdown_after: args.demo_shutdown_secs.map(Duration::from_secs),
    };

    let capabilities = CapabilityProvider::build(&config)?;
    let (terminal, simulation) = Terminal::launch(&config, capabilities)?;

    let demo_task = tokio::spawn(demo.run(simulation.keys, simulation.button));
    let exit = terminal.run().await;
    demo_task.abort();

    info!(?exit, "attendance exiting");
    Ok(())
}
