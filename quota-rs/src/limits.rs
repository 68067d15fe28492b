//! Quota limits
//!
//! The rolling window and per-window cap are compile-time constants.
//! Callers cannot tune them at runtime.

use chrono::TimeDelta;

/// Length of the rolling window in milliseconds (7 days)
pub const WINDOW_MILLIS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Downloads allowed inside one rolling window
pub const MAX_DOWNLOADS_PER_WINDOW: usize = 3;

/// Variant id recorded for bundle (all sizes) downloads
pub const BUNDLE_VARIANT_ID: &str = "all";

/// Rolling window as a duration
pub fn window_duration() -> TimeDelta {
    TimeDelta::milliseconds(WINDOW_MILLIS)
}
