// Domain models: samples, statuses, derived timeline views, response contract

mod api;
mod sample;
mod status;
mod timeline;

pub use api::{
    DaySummary, OutageDetail, ServiceDefinition, ServiceStatus, StatusResponse, TimelinePoint,
};
pub use sample::{
    CheckSample, MAX_CLOCK_SKEW_SECS, RawSample, RawTimestamp, SampleError, ServiceSample,
};
pub use status::{DayStatus, StatusKind, StatusStyle};
pub use timeline::{DayBucket, OutageInterval, ServiceView, SystemView, TimelineEntry};
