// Day classification: one day's samples -> operational / mixed / outage + outage count.

use chrono::{Duration, NaiveDate};

use super::outage::merge_outages;
use crate::models::{CheckSample, DayBucket, DayStatus, OutageInterval, StatusKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayClassification {
    pub status: DayStatus,
    /// Number of non-operational runs, degraded-only runs included.
    pub outage_count: usize,
    pub outages: Vec<OutageInterval>,
}

impl DayClassification {
    /// Absence-of-evidence policy: a completed day with no samples is reported
    /// as operational with no outages. It is never treated as an outage.
    pub fn no_data() -> Self {
        Self {
            status: DayStatus::Operational,
            outage_count: 0,
            outages: Vec::new(),
        }
    }
}

/// Classifies one day's chronological samples.
pub fn classify_day(samples: &[CheckSample], granularity: Duration) -> DayClassification {
    if samples.is_empty() {
        return DayClassification::no_data();
    }
    let outages = merge_outages(samples, granularity);
    let worst = samples
        .iter()
        .map(|s| s.status)
        .max()
        .unwrap_or(StatusKind::Operational);

    let status = match worst {
        StatusKind::Outage => DayStatus::Outage,
        StatusKind::Degraded => DayStatus::Mixed,
        StatusKind::Operational if !outages.is_empty() => DayStatus::Mixed,
        StatusKind::Operational => DayStatus::Operational,
    };
    DayClassification {
        status,
        outage_count: outages.len(),
        outages,
    }
}

pub fn build_day_bucket(
    date: NaiveDate,
    samples: &[CheckSample],
    is_today: bool,
    granularity: Duration,
) -> DayBucket {
    let DayClassification {
        status,
        outage_count,
        outages,
    } = classify_day(samples, granularity);
    DayBucket {
        date,
        status,
        outage_count,
        outage_details: outages,
        is_today,
    }
}
