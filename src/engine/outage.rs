// Outage merging: consecutive non-operational samples collapse into one interval.

use chrono::{DateTime, Duration, Utc};

use crate::models::{CheckSample, OutageInterval, StatusKind};

/// Run being accumulated while samples stay non-operational.
struct OpenRun {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    status: StatusKind,
}

impl OpenRun {
    fn close(self, granularity: Duration) -> OutageInterval {
        OutageInterval {
            start: self.start,
            end: self.end,
            status: self.status,
            duration: round_to_granularity(self.end - self.start, granularity),
        }
    }
}

/// Merges a chronological sample sequence into outage intervals.
///
/// An interval opens at the first non-operational sample and stays open while
/// the following samples are non-operational. Any operational sample closes it,
/// so two runs separated by a single operational sample stay distinct. The
/// interval status is the worst status inside the run. Empty input yields an
/// empty result.
pub fn merge_outages(samples: &[CheckSample], granularity: Duration) -> Vec<OutageInterval> {
    let mut out = Vec::new();
    let mut open: Option<OpenRun> = None;

    for s in samples {
        if s.status.is_operational() {
            if let Some(run) = open.take() {
                out.push(run.close(granularity));
            }
            continue;
        }
        match open.as_mut() {
            Some(run) => {
                run.end = s.timestamp;
                run.status = run.status.max(s.status);
            }
            None => {
                open = Some(OpenRun {
                    start: s.timestamp,
                    end: s.timestamp,
                    status: s.status,
                });
            }
        }
    }
    if let Some(run) = open {
        out.push(run.close(granularity));
    }
    out
}

/// Rounds up to a whole number of sampling periods, minimum one period.
/// A non-positive granularity leaves the duration as measured.
pub fn round_to_granularity(raw: Duration, granularity: Duration) -> Duration {
    let step = granularity.num_milliseconds();
    if step <= 0 {
        return raw.max(Duration::zero());
    }
    let raw_ms = raw.num_milliseconds().max(0);
    let periods = ((raw_ms + step - 1) / step).max(1);
    Duration::milliseconds(periods * step)
}
