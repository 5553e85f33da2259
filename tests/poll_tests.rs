// Poll consumer tests: strict response decoding and last-response-wins sequencing

use std::sync::Arc;

use statusboard::models::{StatusKind, StatusResponse};
use statusboard::poll::{FetchError, ResponseSequencer, decode_status_response};

const BODY: &str = r#"{
    "services": [],
    "overall_status": "degraded",
    "last_updated_display": "2026-10-19 12:00:00",
    "timezone": "UTC"
}"#;

#[test]
fn decode_accepts_well_formed_ok_response() {
    let resp = decode_status_response(200, BODY.as_bytes()).unwrap();
    assert!(resp.services.is_empty());
    assert_eq!(resp.overall_status, StatusKind::Degraded);
    assert_eq!(resp.timezone, "UTC");
}

#[test]
fn decode_rejects_non_success_status() {
    let err = decode_status_response(503, BODY.as_bytes()).unwrap_err();
    assert!(matches!(err, FetchError::Status(503)));
    assert_eq!(err.to_string(), "API error: 503");
}

#[test]
fn decode_rejects_malformed_body() {
    assert!(matches!(
        decode_status_response(200, b"<html>oops</html>"),
        Err(FetchError::Malformed(_))
    ));
    // Missing required field.
    assert!(matches!(
        decode_status_response(200, br#"{"services": []}"#),
        Err(FetchError::Malformed(_))
    ));
}

#[test]
fn sequencer_tickets_increase() {
    let seq: ResponseSequencer<u32> = ResponseSequencer::new();
    let a = seq.begin();
    let b = seq.begin();
    assert!(b > a);
    assert!(seq.latest().is_none());
    assert!(seq.applied_ticket().is_none());
}

#[test]
fn sequencer_applies_in_order_completions() {
    let seq = ResponseSequencer::new();
    let first = seq.begin();
    assert!(seq.complete(first, "first"));
    let second = seq.begin();
    assert!(seq.complete(second, "second"));
    assert_eq!(seq.latest(), Some("second"));
    assert_eq!(seq.applied_ticket(), Some(second));
}

#[test]
fn sequencer_drops_late_stale_response() {
    let seq = ResponseSequencer::new();
    let slow = seq.begin();
    let fast = seq.begin();
    assert!(seq.complete(fast, "fresh"));
    assert!(!seq.complete(slow, "stale"));
    assert_eq!(seq.latest(), Some("fresh"));
    assert_eq!(seq.applied_ticket(), Some(fast));
}

#[test]
fn sequencer_failed_poll_keeps_previous_value() {
    let seq = ResponseSequencer::new();
    let ok = seq.begin();
    seq.complete(ok, decode_status_response(200, BODY.as_bytes()).unwrap());

    let failing = seq.begin();
    if let Ok(resp) = decode_status_response(500, b"") {
        seq.complete(failing, resp);
    }
    let held: StatusResponse = seq.latest().unwrap();
    assert_eq!(held.overall_status, StatusKind::Degraded);
    assert_eq!(seq.applied_ticket(), Some(ok));
}

#[tokio::test]
async fn sequencer_concurrent_completions_keep_newest() {
    let seq = Arc::new(ResponseSequencer::new());
    let tickets: Vec<u64> = (0..16).map(|_| seq.begin()).collect();
    let newest = *tickets.last().unwrap();

    let handles: Vec<_> = tickets
        .into_iter()
        .rev()
        .map(|t| {
            let seq = seq.clone();
            tokio::spawn(async move { seq.complete(t, t) })
        })
        .collect();
    for h in handles {
        h.await.unwrap();
    }
    assert_eq!(seq.latest(), Some(newest));
}
