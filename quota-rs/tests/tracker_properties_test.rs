//! Behavioural tests for the download quota tracker

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use quota_rs::{
    window_duration, AdmissionResult, DenialReason, DownloadRequest, QuotaState,
    MAX_DOWNLOADS_PER_WINDOW,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap()
}

fn ms(n: i64) -> TimeDelta {
    TimeDelta::milliseconds(n)
}

#[test]
fn test_roundtrip_keeps_active_and_stale_events() {
    let state = QuotaState::new()
        .record_download(t0(), &DownloadRequest::variant("moon", "4x5"))
        .record_download(t0() + TimeDelta::days(3), &DownloadRequest::bundle("sun"))
        .record_download(t0() + TimeDelta::days(6), &DownloadRequest::variant("moon", "8x10"));

    let decoded = QuotaState::decode(Some(&state.encode()));
    assert_eq!(decoded, state);

    // queried later, the first event is stale but still serialized
    let later = t0() + TimeDelta::days(8);
    assert_eq!(decoded.active_events(later).len(), 2);
    assert_eq!(decoded.len(), 3);
    assert_eq!(QuotaState::decode(Some(&decoded.encode())), state);
}

#[test]
fn test_decode_never_fails() {
    let inputs = [
        None,
        Some(""),
        Some("}{ definitely not json"),
        Some(r#"{"downloads": "not-an-array"}"#),
        Some(r#"{"downloads": [], "visitor": "abc", "version": 2}"#),
        Some(r#"{"downloads": [{"artId": "moon", "sizeId": "4x5", "timestamp": "yesterday"}]}"#),
        Some("null"),
    ];

    for input in inputs {
        let state = QuotaState::decode(input);
        assert!(state.is_empty(), "expected empty state for {:?}", input);
    }
}

#[test]
fn test_window_boundary() {
    let now = t0();
    let just_outside = QuotaState::new().record_download(
        now - window_duration() - ms(1),
        &DownloadRequest::variant("moon", "4x5"),
    );
    let just_inside = QuotaState::new().record_download(
        now - window_duration() + ms(1),
        &DownloadRequest::variant("moon", "4x5"),
    );

    assert!(just_outside.active_events(now).is_empty());
    assert_eq!(just_inside.active_events(now).len(), 1);
}

#[test]
fn test_quota_exhaustion() {
    let mut state = QuotaState::new();
    for size in ["4x5", "8x10", "16x20"] {
        let request = DownloadRequest::variant("moon", size);
        assert!(state.check_admission(t0(), &request).is_allowed());
        state = state.record_download(t0(), &request);
    }

    let fourth = state.check_admission(t0(), &DownloadRequest::variant("moon", "40x50cm"));
    assert!(!fourth.is_allowed());
    assert_eq!(fourth.reason(), Some(DenialReason::QuotaExceeded));
}

#[test]
fn test_duplicate_variant_denied() {
    let state = QuotaState::new().record_download(t0(), &DownloadRequest::variant("moon", "8x10"));

    let same = state.check_admission(t0(), &DownloadRequest::variant("moon", "8x10"));
    assert_eq!(same.reason(), Some(DenialReason::AlreadyDownloadedVariant));
    if let AdmissionResult::Denied { message, .. } = same {
        assert_eq!(message, "You've already downloaded this size this week.");
    }

    let other = state.check_admission(t0(), &DownloadRequest::variant("moon", "4x5"));
    assert!(other.is_allowed());
}

#[test]
fn test_bundle_independence() {
    let bundled = QuotaState::new().record_download(t0(), &DownloadRequest::bundle("moon"));
    assert!(bundled.has_consumed_bundle(t0(), "moon"));
    for size in ["4x5", "8x10", "16x20", "40x50cm"] {
        assert!(!bundled.has_consumed(t0(), "moon", size));
    }

    let mut individually = QuotaState::new();
    for size in ["4x5", "8x10"] {
        individually = individually.record_download(t0(), &DownloadRequest::variant("moon", size));
    }
    assert!(individually.has_consumed(t0(), "moon", "4x5"));
    assert!(!individually.has_consumed_bundle(t0(), "moon"));
}

#[test]
fn test_full_window_scenario() {
    let state = QuotaState::new()
        .record_download(t0(), &DownloadRequest::variant("1", "A"))
        .record_download(t0(), &DownloadRequest::variant("2", "B"))
        .record_download(t0(), &DownloadRequest::variant("3", "C"));

    assert_eq!(state.remaining(t0()), 0);
    assert_eq!(state.reset_moment(t0()), Some(t0() + TimeDelta::days(7)));

    let after = t0() + TimeDelta::days(7) + ms(1);
    assert_eq!(state.remaining(after), MAX_DOWNLOADS_PER_WINDOW);
    assert!(state.active_events(after).is_empty());
    assert_eq!(state.reset_moment(after), None);
}

#[test]
fn test_status_message_text() {
    let full = QuotaState::new().status_summary(t0());
    assert_eq!(full.remaining, 3);
    assert_eq!(full.limit, 3);
    assert!(full.message.starts_with('3'));
    assert!(full.message.ends_with("available this week"));

    let mut state = QuotaState::new();
    for art in ["1", "2", "3"] {
        state = state.record_download(t0(), &DownloadRequest::variant(art, "4x5"));
    }
    let exhausted = state.status_summary(t0());
    assert_eq!(exhausted.remaining, 0);
    assert!(exhausted.message.contains("Weekly limit reached."));
    assert!(exhausted.message.ends_with("in 7 days."));
}

#[test]
fn test_concurrent_requests_sharing_a_token_both_pass() {
    // two requests replaying the same token are each admitted on their own
    let mut state = QuotaState::new();
    for art in ["1", "2"] {
        state = state.record_download(t0(), &DownloadRequest::variant(art, "4x5"));
    }
    let token = state.encode();

    let first = QuotaState::decode(Some(&token));
    let second = QuotaState::decode(Some(&token));
    let a = DownloadRequest::variant("3", "4x5");
    let b = DownloadRequest::variant("4", "4x5");

    assert!(first.check_admission(t0(), &a).is_allowed());
    assert!(second.check_admission(t0(), &b).is_allowed());
    assert_eq!(first.record_download(t0(), &a).remaining(t0()), 0);
    assert_eq!(second.record_download(t0(), &b).remaining(t0()), 0);
}

#[test]
fn test_extreme_timestamps_read_as_empty() {
    let far_future = r#"{"downloads":[{"artId":"moon","sizeId":"4x5","timestamp":8210266876799999}]}"#;
    let three_far: String = format!(
        r#"{{"downloads":[{0},{0},{0}]}}"#,
        r#"{"artId":"moon","sizeId":"4x5","timestamp":8210266876799999}"#
    );

    for token in [far_future, three_far.as_str()] {
        let state = QuotaState::decode(Some(token));
        assert!(state.is_empty());

        let status = state.status_summary(t0());
        assert_eq!(status.remaining, MAX_DOWNLOADS_PER_WINDOW);
        assert_eq!(status.reset_at, None);
        assert!(state
            .check_admission(t0(), &DownloadRequest::variant("moon", "4x5"))
            .is_allowed());
    }
}
