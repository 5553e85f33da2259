// Model tests: status ordering and parsing, sample validation, response contract shape, formatting

mod common;

use chrono::{Duration, FixedOffset, NaiveDate};
use common::*;
use statusboard::engine::build_service_view;
use statusboard::engine::format::{self, DisplaySettings};
use statusboard::models::*;

#[test]
fn status_kind_is_ordered_by_severity() {
    assert!(StatusKind::Operational < StatusKind::Degraded);
    assert!(StatusKind::Degraded < StatusKind::Outage);
    assert_eq!(
        [StatusKind::Degraded, StatusKind::Outage, StatusKind::Operational]
            .into_iter()
            .max(),
        Some(StatusKind::Outage)
    );
}

#[test]
fn status_kind_parses_known_names_only() {
    assert_eq!("operational".parse::<StatusKind>(), Ok(StatusKind::Operational));
    assert_eq!(" Degraded ".parse::<StatusKind>(), Ok(StatusKind::Degraded));
    assert_eq!("OUTAGE".parse::<StatusKind>(), Ok(StatusKind::Outage));
    assert_eq!(
        "down".parse::<StatusKind>(),
        Err(SampleError::UnknownStatus("down".into()))
    );
}

#[test]
fn status_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&StatusKind::Degraded).unwrap(), "\"degraded\"");
    assert_eq!(serde_json::to_string(&DayStatus::Mixed).unwrap(), "\"mixed\"");
}

#[test]
fn status_style_lookup_table() {
    assert_eq!(StatusKind::Operational.style().label, "Operational");
    assert_eq!(StatusKind::Degraded.style().color, "amber");
    assert_eq!(StatusKind::Outage.style().icon, "x-circle");
    assert_eq!(DayStatus::Mixed.style().label, "Partial Outages");
    assert_eq!(StatusKind::Operational.banner(), "All Systems Operational");
    assert_eq!(StatusKind::Outage.banner(), "Service Outage");
}

fn raw(service: &str, timestamp: RawTimestamp, status: &str, rt: i64) -> RawSample {
    RawSample {
        service: service.into(),
        timestamp,
        status: status.into(),
        response_time_ms: rt,
    }
}

#[test]
fn raw_sample_validates_millis_and_rfc3339() {
    let ms = at(9, 5).timestamp_millis();
    let a = raw("api", RawTimestamp::Millis(ms), "outage", 0)
        .validate(at(12, 0))
        .unwrap();
    assert_eq!(a.sample.timestamp, at(9, 5));
    assert_eq!(a.sample.status, StatusKind::Outage);

    let b = raw(
        " api ",
        RawTimestamp::Text("2026-10-19T11:05:00+02:00".into()),
        "operational",
        120,
    )
    .validate(at(12, 0))
    .unwrap();
    assert_eq!(b.service, "api");
    assert_eq!(b.sample.timestamp, at(9, 5));
    assert_eq!(b.sample.response_time_ms, 120);
}

#[test]
fn raw_sample_rejects_malformed_fields() {
    let ts = RawTimestamp::Millis(at(9, 0).timestamp_millis());
    assert_eq!(
        raw("", ts.clone(), "operational", 1).validate(at(12, 0)),
        Err(SampleError::EmptyService)
    );
    assert!(matches!(
        raw("api", ts.clone(), "sideways", 1).validate(at(12, 0)),
        Err(SampleError::UnknownStatus(_))
    ));
    assert_eq!(
        raw("api", ts.clone(), "operational", -5).validate(at(12, 0)),
        Err(SampleError::NegativeResponseTime(-5))
    );
    assert!(matches!(
        raw("api", ts, "operational", i64::MAX).validate(at(12, 0)),
        Err(SampleError::ResponseTimeOverflow(_))
    ));
    assert!(matches!(
        raw("api", RawTimestamp::Text("yesterday".into()), "operational", 1)
            .validate(at(12, 0)),
        Err(SampleError::InvalidTimestamp(_))
    ));
    assert!(matches!(
        raw("api", RawTimestamp::Millis(-1), "operational", 1).validate(at(12, 0)),
        Err(SampleError::InvalidTimestamp(_))
    ));
}

#[test]
fn raw_sample_rejects_timestamps_beyond_clock_skew() {
    let now = at(12, 0);
    let far = raw(
        "api",
        RawTimestamp::Text("2099-01-01T00:00:00Z".into()),
        "operational",
        10,
    );
    assert!(matches!(
        far.validate(now),
        Err(SampleError::FutureTimestamp { now: n, .. }) if n == now
    ));

    let just_over = now + Duration::seconds(MAX_CLOCK_SKEW_SECS + 1);
    let over = raw("api", RawTimestamp::Millis(just_over.timestamp_millis()), "outage", 0);
    assert!(matches!(
        over.validate(now),
        Err(SampleError::FutureTimestamp { .. })
    ));

    let within = now + Duration::seconds(MAX_CLOCK_SKEW_SECS);
    let ok = raw("api", RawTimestamp::Millis(within.timestamp_millis()), "outage", 0);
    assert_eq!(ok.validate(now).unwrap().sample.timestamp, within);
}

#[test]
fn raw_sample_deserializes_either_timestamp_form() {
    let json = r#"[
        {"service": "api", "timestamp": 1760864700000, "status": "operational", "response_time_ms": 5},
        {"service": "api", "timestamp": "2026-10-19T09:05:00Z", "status": "degraded"}
    ]"#;
    let samples: Vec<RawSample> = serde_json::from_str(json).unwrap();
    assert_eq!(samples[0].timestamp, RawTimestamp::Millis(1760864700000));
    assert_eq!(samples[1].response_time_ms, 0);
    assert!(samples.iter().all(|s| s.validate(at(12, 0)).is_ok()));
}

#[test]
fn status_response_matches_dashboard_contract() {
    let service = ServiceDefinition {
        name: "api".into(),
        description: "Public REST API".into(),
    };
    let samples = vec![op(9, 0), down(9, 5), down(9, 10), op(9, 15)];
    let now = at(12, 0);
    let view = build_service_view(&service, &samples, None, now, &utc_settings());
    let system = SystemView::new(vec![view], now);
    let response = StatusResponse::render(&system, &DisplaySettings::utc());

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["timezone"], "UTC");
    assert_eq!(json["last_updated_display"], "2026-10-19 12:00:00");
    assert_eq!(json["overall_status"], "operational");
    assert_eq!(json["overall_label"], "All Systems Operational");
    assert_eq!(json["operational_count"], 1);
    assert_eq!(json["avg_response_time_ms"], 100);

    let svc = &json["services"][0];
    assert_eq!(svc["current_status"], "operational");
    assert_eq!(svc["status_label"], "Operational");
    assert_eq!(svc["response_time"], 100);
    assert_eq!(svc["uptime_today"], 50.0);
    assert_eq!(svc["last_checked_display"], "2026-10-19 09:15:00");
    assert_eq!(svc["timezone"], "UTC");
    assert_eq!(svc["today_history"][0]["time"], "09:00");
    assert_eq!(svc["today_history"][0]["status"], "outage");

    let timeline = svc["last_7_days_timeline"].as_array().unwrap();
    assert_eq!(timeline.len(), 7);
    let today = &timeline[6];
    assert_eq!(today["is_today"], true);
    assert_eq!(today["date"], "Oct 19");
    assert_eq!(today["day_name"], "Monday");
    assert_eq!(today["status"], "outage");
    assert_eq!(today["status_label"], "Major Outage");
    assert_eq!(timeline[0]["status_label"], "Fully Operational");
    assert_eq!(today["outage_count"], 1);
    let outage = &today["outage_details"][0];
    assert_eq!(outage["start_time"], "09:05");
    assert_eq!(outage["end_time"], "09:10");
    assert_eq!(outage["duration"], "5m");
    assert_eq!(outage["status"], "outage");

    let back: StatusResponse = serde_json::from_value(json).unwrap();
    assert_eq!(back, response);
}

#[test]
fn display_uses_configured_offset() {
    let display = DisplaySettings {
        timezone: "UTC+05:30".into(),
        offset: FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap(),
    };
    assert_eq!(format::format_time_label(at(9, 0), &display), "14:30");
    assert_eq!(
        format::format_last_checked(Some(at(20, 0)), &display),
        "2026-10-20 01:30:00"
    );
    assert_eq!(format::format_last_checked(None, &display), "No data");
}

#[test]
fn format_duration_compact_forms() {
    assert_eq!(format::format_duration(Duration::seconds(45)), "45s");
    assert_eq!(format::format_duration(Duration::minutes(5)), "5m");
    assert_eq!(format::format_duration(Duration::seconds(330)), "5m 30s");
    assert_eq!(format::format_duration(Duration::minutes(80)), "1h 20m");
    assert_eq!(format::format_duration(Duration::hours(2)), "2h");
    assert_eq!(format::format_duration(Duration::hours(51)), "2d 3h");
    assert_eq!(format::format_duration(Duration::seconds(-3)), "0s");
}

#[test]
fn date_formats() {
    let d = NaiveDate::from_ymd_opt(2026, 10, 13).unwrap();
    assert_eq!(format::format_date(d), "Oct 13");
    assert_eq!(format::format_day_name(d), "Tuesday");
}
