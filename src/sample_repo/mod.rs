// SQLite sample store. One row per check sample; timestamps are epoch millis.
// Appends are serialized and per-service non-decreasing in time; reads skip
// rows that no longer decode into a valid sample instead of failing.
// Rows stamped beyond server time plus MAX_CLOCK_SKEW_SECS never count as a
// service's newest sample, so a skewed row cannot block later appends.

mod row;

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tokio::sync::Mutex;
use tracing::instrument;

use crate::models::{CheckSample, MAX_CLOCK_SKEW_SECS, SampleError, ServiceSample};

/// Row filter matching what `row::decode_sample` accepts.
const DECODABLE_ROW: &str = "lower(trim(status)) IN ('operational', 'degraded', 'outage')
     AND response_time_ms BETWEEN 0 AND 4294967295
     AND created_at >= 0";

/// Result of one append batch. Rejected samples do not fail the batch.
#[derive(Debug, Default)]
pub struct AppendOutcome {
    pub inserted: usize,
    pub rejected: Vec<SampleError>,
}

pub struct SampleRepo {
    pool: SqlitePool,
    retention_ms: i64,
    append_lock: Mutex<()>,
}

impl SampleRepo {
    pub async fn connect(
        path: &str,
        max_pool_size: u32,
        retention_days: u32,
    ) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_pool_size)
            .connect_with(opts)
            .await?;
        let retention_ms = (retention_days as i64) * 24 * 60 * 60 * 1000;
        Ok(Self {
            pool,
            retention_ms,
            append_lock: Mutex::new(()),
        })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS check_samples (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                service TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                status TEXT NOT NULL,
                response_time_ms INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_samples_service_created_at ON check_samples(service, created_at)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_samples_created_at ON check_samples(created_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Appends a batch in one transaction. A sample older than the newest stored
    /// sample of its service is rejected; equal timestamps are accepted.
    #[instrument(skip(self, samples), fields(repo = "samples", operation = "append_samples", samples_count = samples.len()))]
    pub async fn append_samples(
        &self,
        samples: &[ServiceSample],
    ) -> anyhow::Result<AppendOutcome> {
        let mut outcome = AppendOutcome::default();
        if samples.is_empty() {
            return Ok(outcome);
        }
        let _guard = self.append_lock.lock().await;
        let horizon_ms = (Utc::now() + Duration::seconds(MAX_CLOCK_SKEW_SECS)).timestamp_millis();
        let mut tx = self.pool.begin().await?;
        let mut latest_by_service: HashMap<&str, Option<i64>> = HashMap::new();

        for s in samples {
            let latest = match latest_by_service.get(s.service.as_str()) {
                Some(latest) => *latest,
                None => {
                    let latest = sqlx::query_scalar::<_, Option<i64>>(
                        "SELECT MAX(created_at) FROM check_samples WHERE service = $1 AND created_at <= $2",
                    )
                    .bind(&s.service)
                    .bind(horizon_ms)
                    .fetch_one(&mut *tx)
                    .await?;
                    latest_by_service.insert(s.service.as_str(), latest);
                    latest
                }
            };

            let ts = s.sample.timestamp.timestamp_millis();
            if let Some(latest_ms) = latest
                && ts < latest_ms
            {
                outcome.rejected.push(SampleError::OutOfOrder {
                    service: s.service.clone(),
                    timestamp: s.sample.timestamp,
                    latest: DateTime::<Utc>::from_timestamp_millis(latest_ms)
                        .unwrap_or_default(),
                });
                continue;
            }

            sqlx::query(
                "INSERT INTO check_samples (service, created_at, status, response_time_ms) VALUES ($1, $2, $3, $4)",
            )
            .bind(&s.service)
            .bind(ts)
            .bind(s.sample.status.as_str())
            .bind(s.sample.response_time_ms as i64)
            .execute(&mut *tx)
            .await?;
            if ts <= horizon_ms {
                latest_by_service.insert(s.service.as_str(), Some(ts));
            }
            outcome.inserted += 1;
        }
        tx.commit().await?;
        Ok(outcome)
    }

    /// Samples of `service` in [from, to). Order: ascending by time.
    #[instrument(skip(self), fields(repo = "samples", operation = "samples_in_range"))]
    pub async fn samples_in_range(
        &self,
        service: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> anyhow::Result<Vec<CheckSample>> {
        let rows = sqlx::query(
            "SELECT created_at, status, response_time_ms FROM check_samples
             WHERE service = $1 AND created_at >= $2 AND created_at < $3
             ORDER BY created_at ASC, id ASC",
        )
        .bind(service)
        .bind(from.timestamp_millis())
        .bind(to.timestamp_millis())
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(sample) = Self::parse_sample_row(service, &row)? {
                out.push(sample);
            }
        }
        Ok(out)
    }

    /// Newest decodable sample of `service` stamped at or before `until`.
    /// Malformed rows are skipped however many of them sit on top.
    #[instrument(skip(self), fields(repo = "samples", operation = "latest_sample"))]
    pub async fn latest_sample(
        &self,
        service: &str,
        until: DateTime<Utc>,
    ) -> anyhow::Result<Option<CheckSample>> {
        let row = sqlx::query(&format!(
            "SELECT created_at, status, response_time_ms FROM check_samples
             WHERE service = $1 AND created_at <= $2 AND {}
             ORDER BY created_at DESC, id DESC LIMIT 1",
            DECODABLE_ROW
        ))
        .bind(service)
        .bind(until.timestamp_millis())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Self::parse_sample_row(service, &row),
            None => Ok(None),
        }
    }

    /// Closes the pool; later operations fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn count_samples(&self) -> anyhow::Result<i64> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM check_samples")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    /// Delete samples older than the retention window.
    #[instrument(skip(self), fields(repo = "samples", operation = "prune_old_data"))]
    pub async fn prune_old_data(&self) -> anyhow::Result<u64> {
        let cutoff = Utc::now().timestamp_millis() - self.retention_ms;
        self.prune_before(cutoff).await
    }

    /// Delete samples with created_at < cutoff_ms.
    pub async fn prune_before(&self, cutoff_ms: i64) -> anyhow::Result<u64> {
        let r = sqlx::query("DELETE FROM check_samples WHERE created_at < $1")
            .bind(cutoff_ms)
            .execute(&self.pool)
            .await?;
        Ok(r.rows_affected())
    }

    /// Reclaim space after deletes (run periodically after pruning).
    #[instrument(skip(self), fields(repo = "samples", operation = "vacuum"))]
    pub async fn vacuum(&self) -> anyhow::Result<()> {
        sqlx::query("VACUUM").execute(&self.pool).await?;
        Ok(())
    }

    /// `Ok(None)` for a row that is present but malformed; it is logged and skipped.
    fn parse_sample_row(
        service: &str,
        row: &sqlx::sqlite::SqliteRow,
    ) -> anyhow::Result<Option<CheckSample>> {
        let created_at: i64 = row.try_get("created_at")?;
        let status: String = row.try_get("status")?;
        let response_time_ms: i64 = row.try_get("response_time_ms")?;

        match row::decode_sample(created_at, &status, response_time_ms) {
            Ok(sample) => Ok(Some(sample)),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    service,
                    created_at,
                    "skipping malformed sample row"
                );
                Ok(None)
            }
        }
    }
}
