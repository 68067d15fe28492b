//! quota-rs: client-held download quota tracker
//!
//! Governs how many files an anonymous visitor may download in a rolling
//! window without any server-side store. The whole state travels as an
//! opaque token (usually a cookie) that the caller decodes, queries, and
//! re-encodes on every request.
//!
//! # Features
//!
//! - Rolling 7-day window, 3 downloads per window
//! - Single-size and all-sizes (bundle) downloads tracked separately
//! - Lenient token decoding: corrupted state reads as "no downloads"
//! - Status messages for display
//!
//! The token is trusted client input. A visitor can reset it by clearing
//! cookies, and two concurrent requests carrying the same token can both be
//! admitted.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use quota_rs::{DownloadRequest, QuotaState};
//!
//! let now = Utc::now();
//! let state = QuotaState::decode(None);
//! let request = DownloadRequest::variant("moon", "8x10");
//!
//! if state.check_admission(now, &request).is_allowed() {
//!     // ...deliver the file, then:
//!     let state = state.record_download(now, &request);
//!     let token = state.encode();
//!     assert!(!token.is_empty());
//! }
//! ```

pub mod admission;
pub mod codec;
pub mod error;
pub mod limits;
pub mod status;
pub mod tracker;
pub mod types;

pub use admission::{AdmissionResult, DenialReason};
pub use error::{QuotaError, Result};
pub use limits::{window_duration, BUNDLE_VARIANT_ID, MAX_DOWNLOADS_PER_WINDOW, WINDOW_MILLIS};
pub use status::{QuotaStatus, RelativeReset};
pub use types::{DownloadEvent, DownloadRequest, QuotaState};
