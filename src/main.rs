//! telemetry-agent - runs a collector builder against a process uptime source
//! and logs collector statistics

#![allow(missing_docs)]

use anyhow::Context;
use async_trait::async_trait;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};
use telemetry_kit::{
    BuilderOptions, CollectorBuilder, LogFormat, MetricSource, MetricsCollector, MetricsConfig,
    Snapshot, init_tracing,
};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "telemetry-agent", version, about = "Collect process metrics into a metrics collector")]
struct Cli {
    /// YAML configuration file; environment variables are used when omitted
    #[arg(short, long, env = "TELEMETRY_CONFIG")]
    config: Option<PathBuf>,

    /// How long to run before printing final stats, in seconds
    #[arg(short, long, default_value_t = 10)]
    duration: u64,

    /// Override the configured collection interval, in milliseconds
    #[arg(short, long)]
    interval_ms: Option<u64>,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Reports process uptime and a monotonically growing tick count
struct UptimeSource {
    started: Instant,
}

#[async_trait]
impl MetricSource for UptimeSource {
    fn name(&self) -> &str {
        "process"
    }

    async fn collect(&self) -> telemetry_kit::Result<Snapshot> {
        let uptime = self.started.elapsed();
        Ok(Snapshot::new()
            .with_gauge("process_uptime_seconds", uptime.as_secs_f64())
            .with_counter("process_uptime_ticks_total", uptime.as_millis() as f64)
            .with_label("source", "uptime"))
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => MetricsConfig::from_file(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => MetricsConfig::from_env()?.validated()?,
    };

    let collector = Arc::new(MetricsCollector::new(config.clone())?);
    collector.start().await?;

    let mut options = BuilderOptions::from_config(&config).with_error_counter();
    if let Some(ms) = cli.interval_ms {
        options = options.with_interval(Duration::from_millis(ms));
    }
    let source = Arc::new(UptimeSource {
        started: Instant::now(),
    });
    let builder = CollectorBuilder::new(collector.clone(), source, options)?;
    builder.start().await?;

    info!(duration_secs = cli.duration, "telemetry-agent running");
    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(cli.duration)) => {}
        _ = tokio::signal::ctrl_c() => info!("Interrupted, shutting down"),
    }

    builder.stop().await?;
    collector.stop().await?;

    info!(
        builder = %serde_json::to_string(&builder.stats())?,
        collector = %serde_json::to_string(&collector.stats())?,
        "Final stats"
    );
    println!("{}", serde_json::to_string_pretty(&collector.gather())?);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.log_format, &cli.log_level) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
