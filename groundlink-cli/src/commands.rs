use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use groundlink_config::GroundlinkConfig;
use groundlink_engine::Gateway;
use groundlink_simulator::{PacketGenerator, UdpEmitter};
use groundlink_store::MemoryStore;
use groundlink_telemetry::{EventLogger, LogFormat, MetricsRecorder};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(name = "groundlink", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the telemetry gateway until Ctrl-C or a fatal pipeline error
    Run(RunArgs),
    /// Send synthetic telemetry packets to a gateway
    Generate(GenerateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Human-readable log output
    #[arg(long)]
    pub dev: bool,
    /// Configuration file; defaults to config/groundlink.yaml layering
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Gateway address (overrides generator.target_addr)
    #[arg(short, long)]
    pub target: Option<SocketAddr>,
    /// Number of packets to send; unlimited when omitted
    #[arg(short = 'n', long)]
    pub count: Option<u64>,
    /// Delay between packets (overrides generator.interval_ms)
    #[arg(long)]
    pub interval_ms: Option<u64>,
    /// Seed for a reproducible packet stream
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long)]
    pub dev: bool,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>, dev: bool) -> anyhow::Result<GroundlinkConfig> {
    let mut config = match path {
        Some(path) => GroundlinkConfig::load_from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => GroundlinkConfig::load().context("loading configuration")?,
    };
    config.telemetry.dev_mode |= dev;

    EventLogger::init(
        &config.telemetry.log_level,
        LogFormat::from_dev_mode(config.telemetry.dev_mode),
    )?;
    Ok(config)
}

/// Cancels the returned token on Ctrl-C.
fn shutdown_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Ctrl-C received, shutting down"),
            Err(e) => error!(error = %e, "Failed to listen for Ctrl-C, shutting down"),
        }
        trigger.cancel();
    });
    token
}

pub async fn run_gateway(args: RunArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref(), args.dev)?;
    debug!(?config, "Configuration loaded");

    let metrics = MetricsRecorder::new().context("registering metrics")?;
    let store = Arc::new(MemoryStore::new());
    let gateway = Gateway::bind(config, store.clone(), metrics.clone()).await?;
    info!(addr = %gateway.local_addr()?, "Gateway listening");

    let result = gateway.run(shutdown_on_ctrl_c()).await;

    info!(
        packets = store.packet_count(),
        anomalies = store.anomaly_count(),
        "Gateway session summary"
    );
    if let Ok(text) = metrics.gather_metrics() {
        debug!(metrics = %text, "Final metrics");
    }
    result.context("gateway stopped with an error")
}

pub async fn run_generator(args: GenerateArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref(), args.dev)?;
    let generator_config = &config.generator;

    let target = args.target.unwrap_or(generator_config.target_addr);
    let interval = args
        .interval_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| generator_config.interval());
    let generator = PacketGenerator::new(generator_config.anomaly_every, args.seed);

    let mut emitter = UdpEmitter::connect(target, generator, interval).await?;
    info!(%target, ?interval, count = ?args.count, "Emitting telemetry");

    let summary = emitter.run(&shutdown_on_ctrl_c(), args.count).await;
    info!(
        sent = summary.sent,
        anomalous = summary.anomalous,
        failed = summary.failed,
        "Emitter finished"
    );
    Ok(())
}
