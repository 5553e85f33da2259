// Shared test helpers
#![allow(dead_code)]

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use statusboard::engine::EngineSettings;
use statusboard::models::{CheckSample, StatusKind};

/// Reference day for engine tests: 2026-10-19 (a Monday).
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, hour, minute, 0).unwrap()
}

pub fn days_before(days: i64, hour: u32, minute: u32) -> DateTime<Utc> {
    at(hour, minute) - Duration::days(days)
}

pub fn sample(timestamp: DateTime<Utc>, status: StatusKind, response_time_ms: u32) -> CheckSample {
    CheckSample::new(timestamp, status, response_time_ms)
}

pub fn op(hour: u32, minute: u32) -> CheckSample {
    sample(at(hour, minute), StatusKind::Operational, 100)
}

pub fn deg(hour: u32, minute: u32) -> CheckSample {
    sample(at(hour, minute), StatusKind::Degraded, 800)
}

pub fn down(hour: u32, minute: u32) -> CheckSample {
    sample(at(hour, minute), StatusKind::Outage, 0)
}

/// Same sample moved years into the past, behind any real clock. For store
/// ordering checks that compare against server time.
pub fn aged(s: CheckSample) -> CheckSample {
    CheckSample {
        timestamp: s.timestamp - Duration::days(2000),
        ..s
    }
}

pub fn granularity() -> Duration {
    Duration::seconds(60)
}

pub fn utc_settings() -> EngineSettings {
    EngineSettings {
        offset: FixedOffset::east_opt(0).unwrap(),
        bucket: Duration::minutes(60),
        granularity: granularity(),
    }
}

pub const TEST_CONFIG: &str = r#"
[server]
port = 8001
host = "0.0.0.0"

[database]
path = "data/test.db"
max_pool_size = 2
flush_rate = 1
flush_interval_secs = 1

[status]
timezone = "UTC"
utc_offset = "+00:00"
bucket_minutes = 60
sample_interval_secs = 60

[maintenance]
prune_interval_secs = 3600
stats_log_interval_secs = 60

[[services]]
name = "api"
description = "Public REST API"

[[services]]
name = "web"
description = "Marketing site"
"#;
