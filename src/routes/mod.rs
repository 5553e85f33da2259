// HTTP routes

mod http;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::engine::EngineSettings;
use crate::engine::format::DisplaySettings;
use crate::ingest::IngestCounters;
use crate::models::ServiceSample;
use crate::sample_repo::SampleRepo;

pub use http::{IngestResponse, RejectedSample};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) repo: Arc<SampleRepo>,
    pub(crate) write_tx: mpsc::Sender<ServiceSample>,
    pub(crate) counters: Arc<IngestCounters>,
    pub(crate) config: Arc<AppConfig>,
    pub(crate) engine: EngineSettings,
    pub(crate) display: DisplaySettings,
}

pub fn app(
    repo: Arc<SampleRepo>,
    write_tx: mpsc::Sender<ServiceSample>,
    counters: Arc<IngestCounters>,
    config: AppConfig,
) -> anyhow::Result<Router> {
    let state = AppState {
        repo,
        write_tx,
        counters,
        engine: config.engine_settings()?,
        display: config.display_settings()?,
        config: Arc::new(config),
    };
    Ok(Router::new()
        .route("/", get(|| async { "statusboard: status aggregation service" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/status", get(http::status_handler)) // GET /api/status
        .route("/api/status/", get(http::status_handler)) // GET /api/status/
        .route("/api/services", get(http::services_handler)) // GET /api/services
        .route("/api/samples", post(http::ingest_handler)) // POST /api/samples
        .route("/api/samples/", post(http::ingest_handler)) // POST /api/samples/
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state))
}
