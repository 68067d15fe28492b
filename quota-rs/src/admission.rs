//! Admission decisions
//!
//! Rules are checked in order and the first match wins: an exhausted quota
//! is reported even when the item was also already downloaded.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::limits::MAX_DOWNLOADS_PER_WINDOW;
use crate::status::RelativeReset;
use crate::types::{DownloadRequest, QuotaState};

/// Machine-readable denial reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenialReason {
    QuotaExceeded,
    AlreadyDownloadedVariant,
    AlreadyDownloadedBundle,
}

impl DenialReason {
    pub fn code(&self) -> &'static str {
        match self {
            DenialReason::QuotaExceeded => "QUOTA_EXCEEDED",
            DenialReason::AlreadyDownloadedVariant => "ALREADY_DOWNLOADED_VARIANT",
            DenialReason::AlreadyDownloadedBundle => "ALREADY_DOWNLOADED_BUNDLE",
        }
    }
}

/// Outcome of `QuotaState::check_admission`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionResult {
    Allowed,
    Denied { reason: DenialReason, message: String },
}

impl AdmissionResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AdmissionResult::Allowed)
    }

    pub fn reason(&self) -> Option<DenialReason> {
        match self {
            AdmissionResult::Allowed => None,
            AdmissionResult::Denied { reason, .. } => Some(*reason),
        }
    }

    fn denied(reason: DenialReason, message: impl Into<String>) -> Self {
        AdmissionResult::Denied {
            reason,
            message: message.into(),
        }
    }
}

impl QuotaState {
    /// Decide whether `request` may be delivered right now
    pub fn check_admission(&self, now: DateTime<Utc>, request: &DownloadRequest) -> AdmissionResult {
        if self.remaining(now) == 0 {
            let reset = RelativeReset::between(now, self.reset_moment(now));
            return AdmissionResult::denied(
                DenialReason::QuotaExceeded,
                format!(
                    "You've reached your weekly limit of {} downloads. Downloads reset {}.",
                    MAX_DOWNLOADS_PER_WINDOW, reset
                ),
            );
        }

        if !request.is_bundle && self.has_consumed(now, &request.artwork_id, &request.variant_id) {
            return AdmissionResult::denied(
                DenialReason::AlreadyDownloadedVariant,
                "You've already downloaded this size this week.",
            );
        }

        if request.is_bundle && self.has_consumed_bundle(now, &request.artwork_id) {
            return AdmissionResult::denied(
                DenialReason::AlreadyDownloadedBundle,
                "You've already downloaded all sizes (ZIP) for this artwork this week.",
            );
        }

        AdmissionResult::Allowed
    }
}
