use chrono::{Duration, FixedOffset};
use serde::Deserialize;
use std::collections::HashSet;

use crate::engine::EngineSettings;
use crate::engine::format::DisplaySettings;
use crate::models::ServiceDefinition;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub status: StatusConfig,
    pub maintenance: MaintenanceConfig,
    #[serde(default)]
    pub services: Vec<ServiceDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_pool_size: u32,
    /// Samples buffered by the writer before a flush.
    pub flush_rate: u64,
    #[serde(default = "default_flush_interval_secs")]
    pub flush_interval_secs: u64,
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

fn default_flush_interval_secs() -> u64 {
    5
}

fn default_retention_days() -> u32 {
    8
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusConfig {
    /// Label shown to consumers next to every rendered time.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Fixed offset for local days and display, e.g. "+00:00" or "-05:00".
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
    /// Width of one today_history bucket; must divide 1440.
    #[serde(default = "default_bucket_minutes")]
    pub bucket_minutes: u32,
    /// Expected period between checks; outage durations are rounded up to it.
    #[serde(default = "default_sample_interval_secs")]
    pub sample_interval_secs: u64,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            utc_offset: default_utc_offset(),
            bucket_minutes: default_bucket_minutes(),
            sample_interval_secs: default_sample_interval_secs(),
        }
    }
}

fn default_timezone() -> String {
    "UTC".into()
}

fn default_utc_offset() -> String {
    "+00:00".into()
}

fn default_bucket_minutes() -> u32 {
    60
}

fn default_sample_interval_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaintenanceConfig {
    pub prune_interval_secs: u64,
    /// How often to log app stats (samples accepted/inserted/rejected) at INFO level.
    pub stats_log_interval_secs: u64,
    /// Optional cron expression for VACUUM (e.g. "0 0 3 * * *"). Uses local time.
    #[serde(default)]
    pub vacuum_schedule: Option<String>,
    /// Run VACUUM every N seconds when vacuum_schedule is not set.
    #[serde(default = "default_vacuum_interval_secs")]
    pub vacuum_interval_secs: u64,
}

fn default_vacuum_interval_secs() -> u64 {
    24 * 3600
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.database.path.is_empty(),
            "database.path must be non-empty"
        );
        anyhow::ensure!(
            self.database.max_pool_size > 0,
            "database.max_pool_size must be > 0, got {}",
            self.database.max_pool_size
        );
        anyhow::ensure!(
            self.database.flush_rate > 0,
            "database.flush_rate must be > 0, got {}",
            self.database.flush_rate
        );
        anyhow::ensure!(
            self.database.flush_interval_secs > 0,
            "database.flush_interval_secs must be > 0, got {}",
            self.database.flush_interval_secs
        );
        anyhow::ensure!(
            self.database.retention_days >= 7,
            "database.retention_days must be >= 7 to cover the 7-day timeline, got {}",
            self.database.retention_days
        );
        anyhow::ensure!(
            self.status.bucket_minutes > 0 && 1440 % self.status.bucket_minutes == 0,
            "status.bucket_minutes must divide 1440, got {}",
            self.status.bucket_minutes
        );
        anyhow::ensure!(
            self.status.sample_interval_secs > 0,
            "status.sample_interval_secs must be > 0, got {}",
            self.status.sample_interval_secs
        );
        anyhow::ensure!(
            !self.status.timezone.trim().is_empty(),
            "status.timezone must be non-empty"
        );
        self.utc_offset()?;
        anyhow::ensure!(
            self.maintenance.prune_interval_secs > 0,
            "maintenance.prune_interval_secs must be > 0, got {}",
            self.maintenance.prune_interval_secs
        );
        anyhow::ensure!(
            self.maintenance.stats_log_interval_secs > 0,
            "maintenance.stats_log_interval_secs must be > 0, got {}",
            self.maintenance.stats_log_interval_secs
        );
        anyhow::ensure!(
            self.maintenance.vacuum_interval_secs > 0,
            "maintenance.vacuum_interval_secs must be > 0, got {}",
            self.maintenance.vacuum_interval_secs
        );
        anyhow::ensure!(
            !self.services.is_empty(),
            "services must list at least one service"
        );
        let mut seen = HashSet::new();
        for service in &self.services {
            anyhow::ensure!(
                !service.name.trim().is_empty(),
                "services.name must be non-empty"
            );
            anyhow::ensure!(
                service.name.trim() == service.name,
                "services.name must not have leading or trailing whitespace, got {:?}",
                service.name
            );
            anyhow::ensure!(
                seen.insert(service.name.as_str()),
                "services.name must be unique, got duplicate {:?}",
                service.name
            );
        }
        Ok(())
    }

    pub fn utc_offset(&self) -> anyhow::Result<FixedOffset> {
        self.status.utc_offset.trim().parse::<FixedOffset>().map_err(|e| {
            anyhow::anyhow!(
                "status.utc_offset must look like +HH:MM, got {:?}: {}",
                self.status.utc_offset,
                e
            )
        })
    }

    pub fn engine_settings(&self) -> anyhow::Result<EngineSettings> {
        Ok(EngineSettings {
            offset: self.utc_offset()?,
            bucket: Duration::minutes(self.status.bucket_minutes as i64),
            granularity: Duration::seconds(self.status.sample_interval_secs as i64),
        })
    }

    pub fn display_settings(&self) -> anyhow::Result<DisplaySettings> {
        Ok(DisplaySettings {
            timezone: self.status.timezone.clone(),
            offset: self.utc_offset()?,
        })
    }

    pub fn is_known_service(&self, name: &str) -> bool {
        self.services.iter().any(|s| s.name == name)
    }
}
