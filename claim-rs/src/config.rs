//! Configuration for claim-rs

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use crate::error::{ClaimError, Result};

/// Main service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClaimConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Download delivery settings
    pub downloads: DownloadsConfig,
    /// Artworks offered for free download
    #[serde(default)]
    pub artworks: Vec<ArtworkConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Listen address (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
}

/// Download delivery settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloadsConfig {
    /// Directory holding `<artId>/<sizeId>.png`
    pub asset_dir: String,
    /// Cookie carrying the quota token
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Mark the quota cookie `Secure`
    #[serde(default)]
    pub secure_cookie: bool,
    /// Skip admission checks entirely (development only)
    #[serde(default)]
    pub bypass_quota: bool,
}

/// One downloadable artwork
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtworkConfig {
    /// Catalog id, also the asset sub-directory name
    pub id: String,
    /// Display title, used for download file names
    pub title: String,
}

fn default_cookie_name() -> String {
    "pp_downloads".to_string()
}

fn env_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

impl ClaimConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClaimError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ClaimError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Create a default development configuration
    pub fn development() -> Self {
        Self {
            server: ServerConfig {
                listen_addr: "127.0.0.1:8080".to_string(),
            },
            downloads: DownloadsConfig {
                asset_dir: "private".to_string(),
                cookie_name: default_cookie_name(),
                secure_cookie: false,
                bypass_quota: false,
            },
            artworks: vec![
                ArtworkConfig {
                    id: "art_1".to_string(),
                    title: "Ethereal Dreams".to_string(),
                },
                ArtworkConfig {
                    id: "art_2".to_string(),
                    title: "Neon Cityscape".to_string(),
                },
                ArtworkConfig {
                    id: "art_3".to_string(),
                    title: "Cosmic Harmony".to_string(),
                },
                ArtworkConfig {
                    id: "art_4".to_string(),
                    title: "Digital Flora".to_string(),
                },
            ],
        }
    }

    /// Apply `CLAIM_BYPASS_QUOTA` and `CLAIM_ASSET_DIR` from the environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var("CLAIM_BYPASS_QUOTA").ok(),
            std::env::var("CLAIM_ASSET_DIR").ok(),
        );
    }

    fn apply_overrides(&mut self, bypass: Option<String>, asset_dir: Option<String>) {
        if let Some(bypass) = bypass {
            self.downloads.bypass_quota = env_flag(&bypass);
        }
        if let Some(asset_dir) = asset_dir.filter(|d| !d.is_empty()) {
            self.downloads.asset_dir = asset_dir;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.server.listen_addr.parse::<SocketAddr>().map_err(|e| {
            ClaimError::Config(format!(
                "Invalid listen address '{}': {}",
                self.server.listen_addr, e
            ))
        })?;

        if self.downloads.cookie_name.is_empty()
            || self
                .downloads
                .cookie_name
                .contains(|c: char| c.is_whitespace() || "=;,".contains(c))
        {
            return Err(ClaimError::Config(format!(
                "Invalid cookie name '{}'",
                self.downloads.cookie_name
            )));
        }

        if self.artworks.is_empty() {
            return Err(ClaimError::Config("No artworks configured".to_string()));
        }

        for artwork in &self.artworks {
            if artwork.id.is_empty()
                || artwork.id.contains(['/', '\\'])
                || artwork.id.starts_with('.')
            {
                return Err(ClaimError::Config(format!(
                    "Invalid artwork id '{}'",
                    artwork.id
                )));
            }
        }

        Ok(())
    }
}

impl Default for ClaimConfig {
    fn default() -> Self {
        Self::development()
    }
}
