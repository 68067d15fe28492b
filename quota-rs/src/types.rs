//! Quota data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::limits::BUNDLE_VARIANT_ID;

/// One recorded consumption of quota
///
/// Field names on the wire are the ones the site's cookie has always used
/// (`artId`, `sizeId`, `timestamp`, `isZip`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadEvent {
    /// Artwork that was downloaded
    #[serde(rename = "artId")]
    pub artwork_id: String,
    /// Size that was downloaded, or `BUNDLE_VARIANT_ID` for a bundle
    #[serde(rename = "sizeId")]
    pub variant_id: String,
    /// When the download was granted (ms since epoch on the wire)
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub occurred_at: DateTime<Utc>,
    /// True for an all-sizes bundle
    #[serde(rename = "isZip", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_bundle: bool,
}

impl DownloadEvent {
    /// Whether the event still counts against the window ending at `cutoff`
    pub(crate) fn is_after(&self, cutoff: DateTime<Utc>) -> bool {
        self.occurred_at > cutoff
    }
}

/// A download the caller wants to check or record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub artwork_id: String,
    pub variant_id: String,
    pub is_bundle: bool,
}

impl DownloadRequest {
    /// Single-size download
    pub fn variant(artwork_id: impl Into<String>, variant_id: impl Into<String>) -> Self {
        DownloadRequest {
            artwork_id: artwork_id.into(),
            variant_id: variant_id.into(),
            is_bundle: false,
        }
    }

    /// All-sizes bundle download
    pub fn bundle(artwork_id: impl Into<String>) -> Self {
        DownloadRequest {
            artwork_id: artwork_id.into(),
            variant_id: BUNDLE_VARIANT_ID.to_string(),
            is_bundle: true,
        }
    }
}

/// Full persisted tracker state
///
/// Every operation takes `&self` and hands back a new value; the state is
/// never mutated in place. Events keep insertion order so serialization is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaState {
    #[serde(rename = "downloads")]
    events: Vec<DownloadEvent>,
}

impl QuotaState {
    /// Empty state (first visit, or expired storage)
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_events(events: Vec<DownloadEvent>) -> Self {
        QuotaState { events }
    }

    /// All recorded events, including ones outside the window
    pub fn events(&self) -> &[DownloadEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
