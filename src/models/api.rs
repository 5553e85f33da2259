// Response contract for GET /api/status/ (snake_case, as the dashboard consumes it).
// All display strings are rendered here from the engine's instants.

use serde::{Deserialize, Serialize};

use super::{
    DayBucket, DayStatus, OutageInterval, ServiceView, StatusKind, SystemView, TimelineEntry,
};
use crate::engine::format::{self, DisplaySettings};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub services: Vec<ServiceStatus>,
    #[serde(default)]
    pub overall_status: StatusKind,
    /// Headline for `overall_status`, e.g. "All Systems Operational".
    #[serde(default)]
    pub overall_label: String,
    #[serde(default)]
    pub operational_count: usize,
    #[serde(default)]
    pub avg_response_time_ms: u32,
    pub last_updated_display: String,
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub name: String,
    pub description: String,
    pub current_status: StatusKind,
    #[serde(default)]
    pub status_label: String,
    pub response_time: u32,
    pub uptime_today: f64,
    pub today_history: Vec<TimelinePoint>,
    pub last_7_days_timeline: Vec<DaySummary>,
    pub last_checked_display: String,
    /// Always the top-level timezone; kept per service for consumers that read it here.
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub time: String,
    pub status: StatusKind,
    pub response_time: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: String,
    pub day_name: String,
    pub status: DayStatus,
    #[serde(default)]
    pub status_label: String,
    pub outage_count: usize,
    pub outage_details: Vec<OutageDetail>,
    pub is_today: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutageDetail {
    pub start_time: String,
    pub end_time: String,
    pub duration: String,
    pub status: StatusKind,
}

/// Identity of a monitored service, as configured and as listed by GET /api/services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl StatusResponse {
    pub fn render(view: &SystemView, display: &DisplaySettings) -> Self {
        Self {
            services: view
                .services
                .iter()
                .map(|s| ServiceStatus::render(s, display))
                .collect(),
            overall_status: view.overall_status,
            overall_label: view.overall_status.banner().to_string(),
            operational_count: view.operational_count,
            avg_response_time_ms: view.avg_response_time_ms,
            last_updated_display: format::format_instant(view.generated_at, display),
            timezone: display.timezone.clone(),
        }
    }
}

impl ServiceStatus {
    pub fn render(view: &ServiceView, display: &DisplaySettings) -> Self {
        Self {
            name: view.name.clone(),
            description: view.description.clone(),
            current_status: view.current_status,
            status_label: view.current_status.style().label.to_string(),
            response_time: view.response_time_ms,
            uptime_today: round_pct(view.uptime_today_pct),
            today_history: view
                .today_history
                .iter()
                .map(|e| TimelinePoint::render(e, display))
                .collect(),
            last_7_days_timeline: view
                .last_7_days
                .iter()
                .map(|d| DaySummary::render(d, display))
                .collect(),
            last_checked_display: format::format_last_checked(view.last_checked, display),
            timezone: display.timezone.clone(),
        }
    }
}

impl TimelinePoint {
    fn render(entry: &TimelineEntry, display: &DisplaySettings) -> Self {
        Self {
            time: format::format_time_label(entry.start, display),
            status: entry.status,
            response_time: entry.response_time_ms,
        }
    }
}

impl DaySummary {
    fn render(day: &DayBucket, display: &DisplaySettings) -> Self {
        Self {
            date: format::format_date(day.date),
            day_name: format::format_day_name(day.date),
            status: day.status,
            status_label: day.status.style().label.to_string(),
            outage_count: day.outage_count,
            outage_details: day
                .outage_details
                .iter()
                .map(|o| OutageDetail::render(o, display))
                .collect(),
            is_today: day.is_today,
        }
    }
}

impl OutageDetail {
    fn render(interval: &OutageInterval, display: &DisplaySettings) -> Self {
        Self {
            start_time: format::format_time_label(interval.start, display),
            end_time: format::format_time_label(interval.end, display),
            duration: format::format_duration(interval.duration),
            status: interval.status,
        }
    }
}

fn round_pct(pct: f64) -> f64 {
    (pct.clamp(0.0, 100.0) * 100.0).round() / 100.0
}
