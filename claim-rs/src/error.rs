//! Error types for claim-rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Result type alias for claim operations
pub type Result<T> = std::result::Result<T, ClaimError>;

/// Claim error types
#[derive(Error, Debug)]
pub enum ClaimError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP bundle could not be built
    #[error("Bundle error: {0}")]
    Bundle(#[from] zip::result::ZipError),

    /// Required query parameter absent
    #[error("Missing {0} parameter")]
    MissingParameter(&'static str),

    /// Artwork id not in the catalog
    #[error("Invalid artId - art piece not found")]
    UnknownArtwork(String),

    /// Size id not known at all
    #[error("Invalid sizeId: {0}")]
    UnknownVariant(String),

    /// Size is listed but not downloadable yet
    #[error("Premium sizes launching soon!")]
    VariantUnavailable(String),

    /// Catalog entry exists but its file does not
    #[error("File not available. Please contact support.")]
    AssetMissing(String),
}

impl ClaimError {
    fn status_code(&self) -> StatusCode {
        match self {
            ClaimError::MissingParameter(_)
            | ClaimError::UnknownVariant(_)
            | ClaimError::VariantUnavailable(_) => StatusCode::BAD_REQUEST,
            ClaimError::UnknownArtwork(_) => StatusCode::NOT_FOUND,
            ClaimError::Config(_)
            | ClaimError::Io(_)
            | ClaimError::Bundle(_)
            | ClaimError::AssetMissing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ClaimError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ClaimError::Config(_) | ClaimError::Io(_) | ClaimError::Bundle(_) => {
                error!("Claim failed: {}", self);
                "An error occurred while processing your request".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
