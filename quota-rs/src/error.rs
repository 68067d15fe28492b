//! Error types for quota-rs

use thiserror::Error;

/// Result type alias for quota operations
pub type Result<T> = std::result::Result<T, QuotaError>;

/// Errors raised while reading a serialized quota token
#[derive(Error, Debug)]
pub enum QuotaError {
    /// Token is not valid percent-encoded UTF-8
    #[error("Invalid token encoding: {0}")]
    InvalidEncoding(String),

    /// Event timestamp too close to the representable range to window
    #[error("Timestamp out of range: {0}")]
    TimestampOutOfRange(i64),

    /// Token decoded but is not the expected JSON document
    #[error("Invalid token payload: {0}")]
    Json(#[from] serde_json::Error),
}
