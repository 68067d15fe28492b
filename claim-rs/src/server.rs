//! HTTP server for free art downloads

use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::clock::{Clock, SystemClock};
use crate::config::ClaimConfig;
use crate::error::Result;
use crate::handlers::{claim_art, quota_status};

/// Shared handler state
pub struct ClaimState {
    /// Artworks and their files
    pub catalog: Catalog,
    /// Source of "now" for quota decisions
    pub clock: Arc<dyn Clock>,
    /// Cookie carrying the quota token
    pub cookie_name: String,
    /// Mark the cookie `Secure`
    pub secure_cookie: bool,
    /// Skip admission checks
    pub bypass_quota: bool,
}

/// Download server
pub struct DownloadServer {
    config: ClaimConfig,
    state: Arc<ClaimState>,
}

impl DownloadServer {
    /// Create a new server using the wall clock
    pub fn new(config: ClaimConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a new server with a custom time source
    pub fn with_clock(config: ClaimConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let catalog = Catalog::new(&config.downloads.asset_dir, config.artworks.clone());

        let state = Arc::new(ClaimState {
            catalog,
            clock,
            cookie_name: config.downloads.cookie_name.clone(),
            secure_cookie: config.downloads.secure_cookie,
            bypass_quota: config.downloads.bypass_quota,
        });

        Ok(Self { config, state })
    }

    /// Build the Axum router
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health_endpoint))
            .route("/api/claim-art", get(claim_art))
            .route("/api/downloads/status", get(quota_status))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the server
    pub async fn run(&self) -> Result<()> {
        let addr = &self.config.server.listen_addr;

        info!("Starting download server on {}", addr);
        info!("Asset directory: {}", self.state.catalog.asset_dir().display());
        info!("Artworks:");
        for artwork in &self.config.artworks {
            info!("  {} ({})", artwork.id, artwork.title);
        }
        if self.state.bypass_quota {
            warn!("Download quota bypass is ENABLED");
        }

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}

/// Health check endpoint
async fn health_endpoint() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
