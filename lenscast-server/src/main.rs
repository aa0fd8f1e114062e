use anyhow::{Context, Result};
use clap::Parser;
use lenscast_server::{ServerConfig, install_metrics_recorder, serve};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_filter).context("invalid log filter")?,
        )
        .init();

    info!("Initializing signaling server...");
    let metrics = install_metrics_recorder().context("metrics recorder")?;

    serve(config, metrics, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Shutdown requested");
    })
    .await
    .context("signaling server failed")
}
