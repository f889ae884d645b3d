//! adserve — ad targeting and attribution engine for the marketing
//! dashboard. Serves the visitor match/attribution endpoints and the
//! operator admin API.

use adserve_api::ApiServer;
use adserve_core::config::AppConfig;
use adserve_store::AdStore;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "adserve")]
#[command(about = "Ad targeting and attribution engine")]
#[command(version)]
struct Cli {
    /// HTTP port (overrides config)
    #[arg(long, env = "ADSERVE__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Metrics port (overrides config)
    #[arg(long, env = "ADSERVE__METRICS__PORT")]
    metrics_port: Option<u16>,

    /// Seed a few demo campaigns into the empty catalog
    #[arg(long, default_value_t = false)]
    seed_demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adserve=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("adserve starting up");

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(port) = cli.metrics_port {
        config.metrics.port = port;
    }

    info!(
        http_port = config.api.http_port,
        metrics_port = config.metrics.port,
        match_limit = config.ads.match_limit,
        "Configuration loaded"
    );

    // Initialize the ad catalog
    let store = Arc::new(AdStore::new());
    if cli.seed_demo {
        store.seed_demo();
    }

    let api_server = ApiServer::new(config, store);

    // Start metrics exporter
    if let Err(e) = api_server.start_metrics().await {
        error!(error = %e, "Failed to start metrics exporter");
    }

    info!("adserve is ready to serve traffic");

    // Start HTTP server (blocks until shutdown)
    api_server.start_http().await?;

    Ok(())
}
