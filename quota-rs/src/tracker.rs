//! Rolling-window queries and state transitions
//!
//! An event counts while `occurred_at > now - window`. Stale events are
//! left in place by reads and dropped only when a download is recorded or
//! the caller prunes explicitly.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::limits::{window_duration, MAX_DOWNLOADS_PER_WINDOW};
use crate::types::{DownloadEvent, DownloadRequest, QuotaState};

impl QuotaState {
    /// Oldest instant an event may have and still be outside the window
    fn window_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(window_duration())
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Events inside the window ending at `now`
    pub fn active_events(&self, now: DateTime<Utc>) -> Vec<&DownloadEvent> {
        let cutoff = Self::window_cutoff(now);
        self.events().iter().filter(|e| e.is_after(cutoff)).collect()
    }

    /// New state without the events that fell out of the window
    pub fn prune_expired(&self, now: DateTime<Utc>) -> QuotaState {
        let events: Vec<DownloadEvent> = self.active_events(now).into_iter().cloned().collect();

        if events.len() != self.len() {
            debug!("Pruned {} expired download(s)", self.len() - events.len());
        }

        QuotaState::from_events(events)
    }

    /// Downloads left in the current window
    pub fn remaining(&self, now: DateTime<Utc>) -> usize {
        MAX_DOWNLOADS_PER_WINDOW.saturating_sub(self.active_events(now).len())
    }

    /// When the oldest counted download leaves the window
    ///
    /// That is the next moment one unit of quota comes back, not
    /// necessarily when the whole quota is restored.
    pub fn reset_moment(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.active_events(now)
            .into_iter()
            .map(|e| e.occurred_at)
            .min()
            .and_then(|oldest| oldest.checked_add_signed(window_duration()))
    }

    /// Whether this exact size was downloaded individually in the window
    pub fn has_consumed(&self, now: DateTime<Utc>, artwork_id: &str, variant_id: &str) -> bool {
        self.active_events(now)
            .into_iter()
            .any(|e| !e.is_bundle && e.artwork_id == artwork_id && e.variant_id == variant_id)
    }

    /// Whether the all-sizes bundle of this artwork was downloaded in the window
    pub fn has_consumed_bundle(&self, now: DateTime<Utc>, artwork_id: &str) -> bool {
        self.active_events(now)
            .into_iter()
            .any(|e| e.is_bundle && e.artwork_id == artwork_id)
    }

    /// Prune, then append a download granted at `now`
    ///
    /// Does not check admission. Call `check_admission` first and record only
    /// once delivery has started.
    pub fn record_download(&self, now: DateTime<Utc>, request: &DownloadRequest) -> QuotaState {
        let mut events = self.prune_expired(now).events().to_vec();
        events.push(DownloadEvent {
            artwork_id: request.artwork_id.clone(),
            variant_id: request.variant_id.clone(),
            occurred_at: now,
            is_bundle: request.is_bundle,
        });
        QuotaState::from_events(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_record_appends_with_now() {
        let state = QuotaState::new().record_download(t0(), &DownloadRequest::variant("moon", "4x5"));
        assert_eq!(state.len(), 1);
        assert_eq!(state.events()[0].occurred_at, t0());
        assert_eq!(state.events()[0].artwork_id, "moon");
    }

    #[test]
    fn test_record_does_not_touch_input() {
        let empty = QuotaState::new();
        let recorded = empty.record_download(t0(), &DownloadRequest::variant("moon", "4x5"));
        assert!(empty.is_empty());
        assert_eq!(recorded.len(), 1);
    }

    #[test]
    fn test_record_prunes_stale_events() {
        let state = QuotaState::new()
            .record_download(t0(), &DownloadRequest::variant("moon", "4x5"))
            .record_download(t0() + TimeDelta::days(8), &DownloadRequest::variant("moon", "8x10"));
        assert_eq!(state.len(), 1);
        assert_eq!(state.events()[0].variant_id, "8x10");
    }

    #[test]
    fn test_reads_leave_stale_events() {
        let state = QuotaState::new().record_download(t0(), &DownloadRequest::variant("moon", "4x5"));
        let later = t0() + TimeDelta::days(30);
        assert!(state.active_events(later).is_empty());
        assert_eq!(state.remaining(later), MAX_DOWNLOADS_PER_WINDOW);
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_event_exactly_at_cutoff_is_expired() {
        let state = QuotaState::new().record_download(t0(), &DownloadRequest::variant("moon", "4x5"));
        assert!(state.active_events(t0() + window_duration()).is_empty());
    }

    #[test]
    fn test_prune_is_idempotent() {
        let state = QuotaState::new()
            .record_download(t0(), &DownloadRequest::variant("moon", "4x5"))
            .record_download(t0() + TimeDelta::days(5), &DownloadRequest::variant("sun", "4x5"));
        let now = t0() + TimeDelta::days(9);

        let once = state.prune_expired(now);
        assert_eq!(once.len(), 1);
        assert_eq!(once.prune_expired(now), once);
        assert_eq!(once.prune_expired(now + TimeDelta::hours(1)), once);
    }

    #[test]
    fn test_remaining_never_negative() {
        let mut state = QuotaState::new();
        for size in ["4x5", "8x10", "16x20", "40x50cm"] {
            state = state.record_download(t0(), &DownloadRequest::variant("moon", size));
        }
        assert_eq!(state.remaining(t0()), 0);
    }

    #[test]
    fn test_reset_moment_uses_oldest_active() {
        let state = QuotaState::new()
            .record_download(t0(), &DownloadRequest::variant("moon", "4x5"))
            .record_download(t0() + TimeDelta::days(2), &DownloadRequest::variant("sun", "4x5"));

        assert_eq!(state.reset_moment(t0() + TimeDelta::days(3)), Some(t0() + TimeDelta::days(7)));
        // once the first event expires the second one drives the reset
        assert_eq!(state.reset_moment(t0() + TimeDelta::days(8)), Some(t0() + TimeDelta::days(9)));
        assert_eq!(state.reset_moment(t0() + TimeDelta::days(10)), None);
    }

    #[test]
    fn test_reset_moment_near_max_instant() {
        let far = DateTime::<Utc>::MAX_UTC - TimeDelta::days(1);
        let state = QuotaState::from_events(vec![DownloadEvent {
            artwork_id: "moon".to_string(),
            variant_id: "4x5".to_string(),
            occurred_at: far,
            is_bundle: false,
        }]);
        assert_eq!(state.active_events(t0()).len(), 1);
        assert_eq!(state.reset_moment(t0()), None);
        assert_eq!(state.remaining(t0()), MAX_DOWNLOADS_PER_WINDOW - 1);
    }

    #[test]
    fn test_window_cutoff_near_min_instant() {
        let now = DateTime::<Utc>::MIN_UTC + TimeDelta::days(1);
        assert_eq!(QuotaState::window_cutoff(now), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_reset_moment_empty() {
        assert_eq!(QuotaState::new().reset_moment(t0()), None);
    }

    #[test]
    fn test_has_consumed_ignores_other_artworks() {
        let state = QuotaState::new().record_download(t0(), &DownloadRequest::variant("moon", "4x5"));
        assert!(state.has_consumed(t0(), "moon", "4x5"));
        assert!(!state.has_consumed(t0(), "sun", "4x5"));
        assert!(!state.has_consumed_bundle(t0(), "moon"));
    }

    #[test]
    fn test_has_consumed_expires_with_window() {
        let state = QuotaState::new().record_download(t0(), &DownloadRequest::bundle("moon"));
        assert!(state.has_consumed_bundle(t0() + TimeDelta::days(6), "moon"));
        assert!(!state.has_consumed_bundle(t0() + TimeDelta::days(7), "moon"));
    }
}
