use anyhow::Result;
use statusboard::*;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    let repo = Arc::new(
        sample_repo::SampleRepo::connect(
            &app_config.database.path,
            app_config.database.max_pool_size,
            app_config.database.retention_days,
        )
        .await?,
    );
    repo.init().await?;
    tracing::info!(
        services = app_config.services.len(),
        stored_samples = repo.count_samples().await?,
        "sample store ready"
    );

    let counters = Arc::new(ingest::IngestCounters::default());
    let (write_tx, write_rx) = mpsc::channel(ingest::writer_channel_capacity(
        app_config.database.flush_rate,
    ));
    let writer_handle = ingest::spawn_sample_writer(
        write_rx,
        repo.clone(),
        ingest::SampleWriterConfig {
            flush_rate: app_config.database.flush_rate,
            flush_interval_secs: app_config.database.flush_interval_secs,
        },
        counters.clone(),
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let maintenance_handle = maintenance_worker::spawn(
        repo.clone(),
        counters.clone(),
        maintenance_worker::MaintenanceWorkerConfig {
            prune_interval_secs: app_config.maintenance.prune_interval_secs,
            stats_log_interval_secs: app_config.maintenance.stats_log_interval_secs,
            vacuum_schedule: app_config.maintenance.vacuum_schedule.clone(),
            vacuum_interval_secs: app_config.maintenance.vacuum_interval_secs,
        },
        shutdown_rx,
    );

    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let app = routes::app(repo.clone(), write_tx, counters, app_config)?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    // The router owns the only writer sender, so the writer drains and exits once the server stops.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Received shutdown signal");
    let _ = shutdown_tx.send(());
    let _ = maintenance_handle.await;
    let _ = writer_handle.await;
    repo.close().await;
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
