// Display formatting. The engine works in UTC instants; every string shown to a
// consumer is rendered here in the single configured offset.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};

/// Shown instead of a last-checked time for a service that has never been checked.
pub const NO_DATA_MARKER: &str = "No data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySettings {
    /// Label reported to consumers (e.g. "UTC").
    pub timezone: String,
    pub offset: FixedOffset,
}

impl DisplaySettings {
    pub fn utc() -> Self {
        Self {
            timezone: "UTC".into(),
            offset: Utc.fix(),
        }
    }
}

pub fn format_time_label(at: DateTime<Utc>, display: &DisplaySettings) -> String {
    at.with_timezone(&display.offset).format("%H:%M").to_string()
}

pub fn format_instant(at: DateTime<Utc>, display: &DisplaySettings) -> String {
    at.with_timezone(&display.offset)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

pub fn format_last_checked(at: Option<DateTime<Utc>>, display: &DisplaySettings) -> String {
    match at {
        Some(at) => format_instant(at, display),
        None => NO_DATA_MARKER.to_string(),
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

pub fn format_day_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

/// Compact duration: "45s", "5m", "5m 30s", "1h 20m", "2d 3h".
pub fn format_duration(d: Duration) -> String {
    let total = d.num_seconds().max(0);
    let (days, hours, minutes, seconds) = (
        total / 86_400,
        (total % 86_400) / 3600,
        (total % 3600) / 60,
        total % 60,
    );
    let (major, minor) = if days > 0 {
        ((days, 'd'), (hours, 'h'))
    } else if hours > 0 {
        ((hours, 'h'), (minutes, 'm'))
    } else if minutes > 0 {
        ((minutes, 'm'), (seconds, 's'))
    } else {
        return format!("{}s", seconds);
    };
    if minor.0 == 0 {
        format!("{}{}", major.0, major.1)
    } else {
        format!("{}{} {}{}", major.0, major.1, minor.0, minor.1)
    }
}
