// Raw check samples: the validated domain form and the untrusted wire form

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::StatusKind;

/// One health-check result. Immutable once recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSample {
    pub timestamp: DateTime<Utc>,
    pub status: StatusKind,
    pub response_time_ms: u32,
}

impl CheckSample {
    pub fn new(timestamp: DateTime<Utc>, status: StatusKind, response_time_ms: u32) -> Self {
        Self {
            timestamp,
            status,
            response_time_ms,
        }
    }
}

/// A sample tagged with the service it belongs to (unit of ingestion and storage).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSample {
    pub service: String,
    pub sample: CheckSample,
}

/// Rejection reasons for a single sample. One bad sample never aborts a batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SampleError {
    #[error("service name is empty")]
    EmptyService,
    #[error("unknown service: {0}")]
    UnknownService(String),
    #[error("unknown status: {0:?}")]
    UnknownStatus(String),
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("negative response time: {0}ms")]
    NegativeResponseTime(i64),
    #[error("response time out of range: {0}ms")]
    ResponseTimeOverflow(i64),
    #[error("timestamp {timestamp} is ahead of server time {now}")]
    FutureTimestamp {
        timestamp: DateTime<Utc>,
        now: DateTime<Utc>,
    },
    #[error("sample for {service} at {timestamp} is older than latest stored sample at {latest}")]
    OutOfOrder {
        service: String,
        timestamp: DateTime<Utc>,
        latest: DateTime<Utc>,
    },
}

/// How far ahead of server time a checker clock may run before its samples are refused.
pub const MAX_CLOCK_SKEW_SECS: i64 = 300;

/// Timestamp as sent by checkers: RFC 3339 text or epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Millis(i64),
    Text(String),
}

/// Untrusted sample as posted to the ingestion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSample {
    pub service: String,
    pub timestamp: RawTimestamp,
    pub status: String,
    #[serde(default)]
    pub response_time_ms: i64,
}

impl RawSample {
    /// Checks shape and ranges against server time `now`. Whether the service
    /// is configured is the caller's concern.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<ServiceSample, SampleError> {
        let service = self.service.trim();
        if service.is_empty() {
            return Err(SampleError::EmptyService);
        }
        let status: StatusKind = self.status.parse()?;
        let timestamp = parse_timestamp(&self.timestamp)?;
        if timestamp > now + Duration::seconds(MAX_CLOCK_SKEW_SECS) {
            return Err(SampleError::FutureTimestamp { timestamp, now });
        }
        if self.response_time_ms < 0 {
            return Err(SampleError::NegativeResponseTime(self.response_time_ms));
        }
        let response_time_ms = u32::try_from(self.response_time_ms)
            .map_err(|_| SampleError::ResponseTimeOverflow(self.response_time_ms))?;
        Ok(ServiceSample {
            service: service.to_string(),
            sample: CheckSample::new(timestamp, status, response_time_ms),
        })
    }
}

fn parse_timestamp(raw: &RawTimestamp) -> Result<DateTime<Utc>, SampleError> {
    match raw {
        RawTimestamp::Millis(ms) if *ms >= 0 => DateTime::<Utc>::from_timestamp_millis(*ms)
            .ok_or_else(|| SampleError::InvalidTimestamp(ms.to_string())),
        RawTimestamp::Millis(ms) => Err(SampleError::InvalidTimestamp(ms.to_string())),
        RawTimestamp::Text(s) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| SampleError::InvalidTimestamp(s.clone())),
    }
}
