//! hottrackd - hot-tracking engine host process
//!
//! Loads a `HotTrackConfig`, enables the engine (which spawns the aging
//! worker and wires the default port adapters), serves Prometheus metrics,
//! and runs until `SIGINT`/`SIGTERM`, at which point it disables the engine
//! before exiting.
//!
//! This binary is the thinnest possible host: the real VFS hooks and kernel
//! shrinker registration are external collaborators `hottrack-core` only
//! models as ports, so there is nothing here beyond lifecycle plumbing and
//! observability.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hottrack_core::HotTrackConfig;
use hottrack_telemetry::{HotTrackMetrics, MetricsServer};

#[derive(Debug, Parser)]
#[command(name = "hottrackd", version, about = "Hot-tracking engine host process")]
struct Args {
    /// Path to a HotTrackConfig YAML file; defaults are used if omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to serve Prometheus metrics on.
    #[arg(long, default_value = "127.0.0.1:9100")]
    metrics_addr: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => HotTrackConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => HotTrackConfig::default(),
    };

    let validation_errors = config.validate();
    if !validation_errors.is_empty() {
        for error in &validation_errors {
            warn!(field = %error.field, message = %error.message, "invalid configuration");
        }
        anyhow::bail!("configuration failed validation");
    }

    let handle = hottrack_core::enable(config).context("failed to enable hot-tracking engine")?;
    info!("hot-tracking engine running");

    let metrics = Arc::new(HotTrackMetrics::new().context("failed to initialize metrics")?);
    let metrics_server = MetricsServer::new(metrics.clone(), &args.metrics_addr)
        .context("failed to bind metrics server")?;
    let shutdown = tokio_util::sync::CancellationToken::new();
    let server_shutdown = shutdown.clone();
    let server_task = tokio::spawn(async move {
        if let Err(err) = metrics_server.run(server_shutdown).await {
            warn!(error = %err, "metrics server exited with error");
        }
    });

    let root = handle.root().clone();
    let poll_metrics = tokio::spawn({
        let metrics = metrics.clone();
        let shutdown = shutdown.clone();
        async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(15));
            loop {
                tokio::select! {
                    _ = ticker.tick() => metrics.refresh_from_root(&root),
                    _ = shutdown.cancelled() => break,
                }
            }
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("shutdown signal received");

    shutdown.cancel();
    let _ = poll_metrics.await;
    let _ = server_task.await;

    hottrack_core::disable(handle).context("failed to disable hot-tracking engine")?;
    info!("hot-tracking engine stopped");

    Ok(())
}
