// Derived views. Recomputed from the sample window on every read; never stored.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::{DayStatus, StatusKind};

/// A run of consecutive non-operational samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutageInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Worst status seen within the run.
    pub status: StatusKind,
    /// `end - start`, rounded up to the sampling granularity (never zero).
    pub duration: Duration,
}

/// One display bucket of "today" (e.g. one hour).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEntry {
    pub start: DateTime<Utc>,
    pub status: StatusKind,
    pub response_time_ms: u32,
}

/// One local calendar day of the 7-day rollup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub status: DayStatus,
    pub outage_count: usize,
    pub outage_details: Vec<OutageInterval>,
    pub is_today: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceView {
    pub name: String,
    pub description: String,
    pub current_status: StatusKind,
    pub response_time_ms: u32,
    pub uptime_today_pct: f64,
    pub today_history: Vec<TimelineEntry>,
    pub last_7_days: Vec<DayBucket>,
    /// Timestamp of the latest sample; `None` when the service was never checked.
    pub last_checked: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SystemView {
    pub services: Vec<ServiceView>,
    pub overall_status: StatusKind,
    /// Services whose current status is operational.
    pub operational_count: usize,
    /// Mean current response time across services, rounded half-up; 0 with no services.
    pub avg_response_time_ms: u32,
    pub generated_at: DateTime<Utc>,
}
