//! Opaque token codec
//!
//! A token is the JSON document `{"downloads":[...]}` percent-encoded with
//! the same unreserved set browsers keep for `encodeURIComponent`, so it can
//! be stored verbatim as a cookie value.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::{debug, error};

use crate::error::{QuotaError, Result};
use crate::limits::window_duration;
use crate::types::QuotaState;

/// Characters left untouched when encoding a token
const TOKEN_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

impl QuotaState {
    /// Decode a token, degrading to an empty state on any failure
    ///
    /// A missing, corrupted or tampered token must never block downloads, so
    /// this never fails.
    pub fn decode(raw: Option<&str>) -> QuotaState {
        let Some(raw) = raw.filter(|r| !r.is_empty()) else {
            return QuotaState::new();
        };

        match Self::try_decode(raw) {
            Ok(state) => state,
            Err(e) => {
                debug!("Discarding unreadable quota token: {}", e);
                QuotaState::new()
            }
        }
    }

    /// Decode a token, reporting why it could not be read
    pub fn try_decode(raw: &str) -> Result<QuotaState> {
        let json = percent_decode_str(raw)
            .decode_utf8()
            .map_err(|e| QuotaError::InvalidEncoding(e.to_string()))?;

        let state: QuotaState = serde_json::from_str(&json)?;

        // every timestamp must survive shifting by one window either way
        let window = window_duration();
        if let Some(event) = state.events().iter().find(|e| {
            e.occurred_at.checked_add_signed(window).is_none()
                || e.occurred_at.checked_sub_signed(window).is_none()
        }) {
            return Err(QuotaError::TimestampOutOfRange(event.occurred_at.timestamp_millis()));
        }

        Ok(state)
    }

    /// Serialize every in-memory event, stale ones included
    pub fn encode(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => utf8_percent_encode(&json, TOKEN_SAFE).to_string(),
            Err(e) => {
                error!("Failed to serialize quota state: {}", e);
                String::new()
            }
        }
    }
}
