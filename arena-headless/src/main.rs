//! # Minion Arena Headless
//!
//! Plays matches on a simulated clock and prints a JSON summary.

use arena_headless::{CliArgs, HeadlessConfig, Simulation};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,arena_core=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    // Use JSON format for log shipping (RUST_LOG_FORMAT=json)
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let config = HeadlessConfig::from_args(args)?;

    tracing::info!(
        "Viewport {}x{}, placement {} ms, seed {:?}",
        config.session.width,
        config.session.height,
        config.session.placement_ms,
        config.session.seed
    );

    let mut simulation = Simulation::new(config)?;
    let summary = simulation.run()?;

    println!("{}", serde_json::to_string_pretty(&summary.to_json())?);
    if summary.truncated {
        anyhow::bail!("stopped after {} frames", summary.frames);
    }
    Ok(())
}
