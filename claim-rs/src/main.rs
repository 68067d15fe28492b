//! claim-rs: free art download server

use claim_rs::{ClaimConfig, DownloadServer};
use std::path::Path;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "claim_rs=info,quota_rs=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting claim-rs v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = if let Some(config_path) = std::env::args().nth(1) {
        info!("Loading configuration from {}", config_path);
        ClaimConfig::from_file(Path::new(&config_path))?
    } else {
        info!("No config file specified, using development defaults");
        ClaimConfig::development()
    };
    config.apply_env_overrides();

    let server = DownloadServer::new(config)?;
    server.run().await?;

    Ok(())
}
