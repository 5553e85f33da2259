// Per-service aggregation: latest sample + today's buckets + 7-day rollup.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};

use super::bucket::bucket_day;
use super::day::build_day_bucket;
use crate::models::{CheckSample, ServiceDefinition, ServiceView, StatusKind};

/// Days in the rollup, today included.
pub const DAYS_IN_TIMELINE: usize = 7;

/// Reported as today's uptime when nothing was sampled yet today (absence of evidence).
pub const NO_SAMPLES_UPTIME_PCT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Offset that defines local calendar days.
    pub offset: FixedOffset,
    /// Width of one today_history bucket.
    pub bucket: Duration,
    /// Sampling period; outage durations are rounded up to it.
    pub granularity: Duration,
}

impl EngineSettings {
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    /// UTC instant of local midnight starting `date`.
    pub fn day_start(&self, date: NaiveDate) -> DateTime<Utc> {
        let local_midnight = date.and_time(NaiveTime::MIN);
        (local_midnight - Duration::seconds(self.offset.local_minus_utc() as i64)).and_utc()
    }

    /// First instant covered by the rollup ending on the local day of `now`.
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = self.local_date(now);
        self.day_start(today - Duration::days(DAYS_IN_TIMELINE as i64 - 1))
    }
}

/// Builds one service's view.
///
/// `samples` is the service's sample window (any order, may extend outside the
/// 7 days); `latest` is the newest sample ever stored, which may predate the
/// window. A service with no sample at all reports `outage` with no last-checked
/// time: absence of any data is surfaced, not hidden.
pub fn build_service_view(
    service: &ServiceDefinition,
    samples: &[CheckSample],
    latest: Option<CheckSample>,
    now: DateTime<Utc>,
    settings: &EngineSettings,
) -> ServiceView {
    let mut sorted: Vec<CheckSample> = samples
        .iter()
        .filter(|s| s.timestamp <= now)
        .copied()
        .collect();
    sorted.sort_by_key(|s| s.timestamp);

    let latest = match (latest.filter(|s| s.timestamp <= now), sorted.last().copied()) {
        (Some(a), Some(b)) => Some(if b.timestamp >= a.timestamp { b } else { a }),
        (a, b) => a.or(b),
    };

    let today = settings.local_date(now);
    let mut last_7_days = Vec::with_capacity(DAYS_IN_TIMELINE);
    for days_ago in (0..DAYS_IN_TIMELINE as i64).rev() {
        let date = today - Duration::days(days_ago);
        let day_samples = samples_in_day(&sorted, settings.day_start(date));
        last_7_days.push(build_day_bucket(
            date,
            day_samples,
            days_ago == 0,
            settings.granularity,
        ));
    }

    let today_start = settings.day_start(today);
    let today_samples = samples_in_day(&sorted, today_start);

    let (current_status, response_time_ms) = match latest {
        Some(s) => (s.status, s.response_time_ms),
        None => (StatusKind::Outage, 0),
    };

    ServiceView {
        name: service.name.clone(),
        description: service.description.clone(),
        current_status,
        response_time_ms,
        uptime_today_pct: uptime_pct(today_samples),
        today_history: bucket_day(today_samples, today_start, settings.bucket),
        last_7_days,
        last_checked: latest.map(|s| s.timestamp),
    }
}

/// Share of operational samples, in percent. No samples -> [`NO_SAMPLES_UPTIME_PCT`].
pub fn uptime_pct(samples: &[CheckSample]) -> f64 {
    if samples.is_empty() {
        return NO_SAMPLES_UPTIME_PCT;
    }
    let up = samples.iter().filter(|s| s.status.is_operational()).count();
    (100.0 * up as f64 / samples.len() as f64).clamp(0.0, 100.0)
}

/// Sub-slice of sorted samples in `[day_start, day_start + 1 day)`.
fn samples_in_day(sorted: &[CheckSample], day_start: DateTime<Utc>) -> &[CheckSample] {
    let day_end = day_start + Duration::days(1);
    let from = sorted.partition_point(|s| s.timestamp < day_start);
    let to = sorted.partition_point(|s| s.timestamp < day_end);
    &sorted[from..to]
}
