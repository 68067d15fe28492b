//! Human-readable quota status

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::limits::MAX_DOWNLOADS_PER_WINDOW;
use crate::types::QuotaState;

/// Coarse "when does quota come back" phrase
///
/// Buckets by UTC calendar day between `now` and the reset moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeReset {
    Now,
    Today,
    Tomorrow,
    InDays(i64),
}

impl RelativeReset {
    pub fn between(now: DateTime<Utc>, reset_at: Option<DateTime<Utc>>) -> Self {
        let Some(reset_at) = reset_at.filter(|r| *r > now) else {
            return RelativeReset::Now;
        };

        match (reset_at.date_naive() - now.date_naive()).num_days() {
            0 => RelativeReset::Today,
            1 => RelativeReset::Tomorrow,
            days => RelativeReset::InDays(days),
        }
    }
}

impl fmt::Display for RelativeReset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelativeReset::Now => write!(f, "now"),
            RelativeReset::Today => write!(f, "today"),
            RelativeReset::Tomorrow => write!(f, "tomorrow"),
            RelativeReset::InDays(days) => write!(f, "in {} days", days),
        }
    }
}

/// Snapshot shown next to download buttons
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotaStatus {
    pub remaining: usize,
    pub limit: usize,
    pub reset_at: Option<DateTime<Utc>>,
    pub message: String,
}

impl QuotaState {
    /// Remaining quota, reset moment and a display message
    pub fn status_summary(&self, now: DateTime<Utc>) -> QuotaStatus {
        let remaining = self.remaining(now);
        let reset_at = self.reset_moment(now);
        let reset_text = RelativeReset::between(now, reset_at);

        let message = if remaining == MAX_DOWNLOADS_PER_WINDOW {
            format!("{} free downloads available this week", remaining)
        } else if remaining > 0 {
            format!(
                "{} download{} remaining. Resets {}.",
                remaining,
                if remaining == 1 { "" } else { "s" },
                reset_text
            )
        } else {
            format!("Weekly limit reached. Downloads reset {}.", reset_text)
        };

        QuotaStatus {
            remaining,
            limit: MAX_DOWNLOADS_PER_WINDOW,
            reset_at,
            message,
        }
    }
}
