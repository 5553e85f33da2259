// Column values -> CheckSample. Rows written by older or foreign writers may not decode.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::models::{CheckSample, SampleError, StatusKind};

pub(super) fn decode_sample(
    created_at: i64,
    status: &str,
    response_time_ms: i64,
) -> Result<CheckSample, SampleError> {
    let timestamp = DateTime::<Utc>::from_timestamp_millis(created_at)
        .ok_or_else(|| SampleError::InvalidTimestamp(created_at.to_string()))?;
    let status = StatusKind::from_str(status)?;
    if response_time_ms < 0 {
        return Err(SampleError::NegativeResponseTime(response_time_ms));
    }
    let response_time_ms = u32::try_from(response_time_ms)
        .map_err(|_| SampleError::ResponseTimeOverflow(response_time_ms))?;
    Ok(CheckSample::new(timestamp, status, response_time_ms))
}
