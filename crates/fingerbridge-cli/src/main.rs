//! `fingerbridge`: inspect and exercise the fingerprint adapter.
//!
//! `props` prints the sensor descriptor built from configuration.
//! `simulate` runs the full adapter against simulated vendor drivers and
//! prints the events a client would receive.

mod simulate;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use fingerbridge_core::SensorConfig;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use crate::simulate::SimulateArgs;

#[derive(Debug, Parser)]
#[command(name = "fingerbridge", about = "Legacy fingerprint driver adapter", version)]
struct Cli {
    /// Path to the TOML sensor configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `fingerbridge_hal=trace`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the sensor descriptor as JSON.
    Props,

    /// Run the adapter against simulated drivers.
    Simulate(SimulateArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref())?;

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Props => print_props(config),
        Command::Simulate(args) => simulate::run(config, args).await,
    }
}

fn init_tracing(log_level: Option<&str>) -> anyhow::Result<()> {
    let env_filter = match log_level {
        Some(level) => EnvFilter::try_new(level).context("invalid --log-level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to init tracing: {err}"))
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SensorConfig> {
    let Some(path) = path else {
        info!("No configuration given, using defaults");
        return Ok(SensorConfig::default());
    };

    let config = SensorConfig::from_file(path)
        .with_context(|| format!("cannot load config {}", path.display()))?;
    info!("Configuration loaded from {}", path.display());
    Ok(config)
}

/// Capability queries need no driver, so this skips discovery.
fn print_props(config: SensorConfig) -> anyhow::Result<()> {
    config.validate()?;
    let provider = fingerbridge_service::SensorPropertyProvider::new(config.into());
    let json = serde_json::to_string_pretty(&provider.sensor_props())?;
    println!("{json}");
    Ok(())
}
