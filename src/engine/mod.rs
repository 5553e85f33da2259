// Status engine: pure, synchronous functions of a sample window.
// Sample store -> {bucket, outage} -> day -> service -> system.

pub mod bucket;
pub mod day;
pub mod format;
pub mod outage;
pub mod service;
pub mod system;

pub use bucket::bucket_day;
pub use day::{DayClassification, build_day_bucket, classify_day};
pub use outage::merge_outages;
pub use service::{DAYS_IN_TIMELINE, EngineSettings, build_service_view, uptime_pct};
pub use system::{avg_response_time_ms, overall_status};
