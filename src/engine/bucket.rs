// Day bucketing: fixed, contiguous display buckets over one 24h day.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::models::{CheckSample, StatusKind, TimelineEntry};

#[derive(Default)]
struct BucketAcc {
    worst: StatusKind,
    response_sum: u64,
    count: u64,
}

impl BucketAcc {
    fn add(&mut self, s: &CheckSample) {
        self.worst = self.worst.max(s.status);
        self.response_sum += s.response_time_ms as u64;
        self.count += 1;
    }

    /// Arithmetic mean rounded half-up.
    fn mean_response(&self) -> u32 {
        let mean = (self.response_sum + self.count / 2) / self.count.max(1);
        u32::try_from(mean).unwrap_or(u32::MAX)
    }
}

/// Partitions the day starting at `day_start` into `[start + k*bucket, start + (k+1)*bucket)`
/// buckets and reduces each non-empty one to worst status + mean response time.
/// Buckets with no samples are left out; samples outside the day are ignored.
pub fn bucket_day(
    samples: &[CheckSample],
    day_start: DateTime<Utc>,
    bucket: Duration,
) -> Vec<TimelineEntry> {
    let width = bucket.num_milliseconds();
    if width <= 0 {
        return Vec::new();
    }
    let day_end = day_start + Duration::days(1);

    let mut by_bucket: BTreeMap<i64, BucketAcc> = BTreeMap::new();
    for s in samples {
        if s.timestamp < day_start || s.timestamp >= day_end {
            continue;
        }
        let offset_ms = (s.timestamp - day_start).num_milliseconds();
        by_bucket.entry(offset_ms / width).or_default().add(s);
    }

    by_bucket
        .into_iter()
        .map(|(index, acc)| TimelineEntry {
            start: day_start + Duration::milliseconds(index * width),
            status: acc.worst,
            response_time_ms: acc.mean_response(),
        })
        .collect()
}
