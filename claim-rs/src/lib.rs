//! claim-rs: free art downloads with a weekly quota
//!
//! Serves artwork files over HTTP and gates every download with the
//! cookie-held quota from `quota-rs`.
//!
//! # Endpoints
//!
//! - `GET /api/claim-art?artId=<id>&sizeId=<size>` - one size as PNG
//! - `GET /api/claim-art?artId=<id>&type=all` - every size as a ZIP
//! - `GET /api/downloads/status` - remaining quota for the caller
//! - `GET /health` - liveness
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! listen_addr = "0.0.0.0:8080"
//!
//! [downloads]
//! asset_dir = "/srv/free-art"
//! cookie_name = "pp_downloads"
//! secure_cookie = true
//! bypass_quota = false
//!
//! [[artworks]]
//! id = "art_1"
//! title = "Ethereal Dreams"
//! ```

pub mod bundle;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod cookie;
pub mod error;
pub mod handlers;
pub mod server;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ClaimConfig;
pub use error::{ClaimError, Result};
pub use server::DownloadServer;
