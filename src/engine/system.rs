// Cross-service reduction into one deployment status.

use chrono::{DateTime, Utc};

use crate::models::{ServiceView, StatusKind, SystemView};

/// `operational` if every service is operational (vacuously true for none),
/// else `outage` if any service is down, else `degraded`.
///
/// Independent of order, and monotonic: turning any service into an outage
/// never lowers the result.
pub fn overall_status<I>(statuses: I) -> StatusKind
where
    I: IntoIterator<Item = StatusKind>,
{
    let mut all_operational = true;
    for status in statuses {
        match status {
            StatusKind::Outage => return StatusKind::Outage,
            StatusKind::Degraded => all_operational = false,
            StatusKind::Operational => {}
        }
    }
    if all_operational {
        StatusKind::Operational
    } else {
        StatusKind::Degraded
    }
}

/// Mean of the given response times, rounded half-up. Empty input -> 0.
pub fn avg_response_time_ms<I>(response_times: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    let (sum, count) = response_times
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), rt| (sum + rt as u64, count + 1));
    if count == 0 {
        return 0;
    }
    u32::try_from((sum + count / 2) / count).unwrap_or(u32::MAX)
}

impl SystemView {
    pub fn new(services: Vec<ServiceView>, generated_at: DateTime<Utc>) -> Self {
        let overall_status = overall_status(services.iter().map(|s| s.current_status));
        let operational_count = services
            .iter()
            .filter(|s| s.current_status.is_operational())
            .count();
        let avg_response_time_ms =
            avg_response_time_ms(services.iter().map(|s| s.response_time_ms));
        Self {
            services,
            overall_status,
            operational_count,
            avg_response_time_ms,
            generated_at,
        }
    }
}
