// HTTP handlers: version, status, service list, sample ingestion

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::Ordering;

use super::AppState;
use crate::models::{RawSample, SampleError, ServiceDefinition, StatusResponse};
use crate::report;

const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Handler failure, rendered as `{ "error": ... }`.
pub(super) enum ApiError {
    Internal(anyhow::Error),
    BadRequest(String),
    Unavailable(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            ApiError::Internal(e) => {
                tracing::warn!(error = %e, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::Unavailable(m) => (StatusCode::SERVICE_UNAVAILABLE, m.to_string()),
        };
        (code, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e)
    }
}

/// GET /version: returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/status/: recomputes every service view from the current sample window.
pub(super) async fn status_handler(
    State(state): State<AppState>,
) -> Result<Json<StatusResponse>, ApiError> {
    let now = chrono::Utc::now();
    let view =
        report::build_system_view(&state.repo, &state.config.services, &state.engine, now).await?;
    Ok(Json(StatusResponse::render(&view, &state.display)))
}

/// GET /api/services: configured services, in display order.
pub(super) async fn services_handler(
    State(state): State<AppState>,
) -> Json<Vec<ServiceDefinition>> {
    Json(state.config.services.clone())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedSample {
    pub index: usize,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResponse {
    pub accepted: usize,
    pub rejected: Vec<RejectedSample>,
}

/// POST /api/samples/: body is an array of samples or `{ "samples": [...] }`.
/// Each sample is validated on its own; bad ones are reported and skipped.
pub(super) async fn ingest_handler(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<IngestResponse>), ApiError> {
    let items = match body {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("samples") {
            Some(serde_json::Value::Array(items)) => items,
            _ => {
                return Err(ApiError::BadRequest(
                    "expected an array of samples or {\"samples\": [...]}".into(),
                ));
            }
        },
        _ => {
            return Err(ApiError::BadRequest(
                "expected an array of samples or {\"samples\": [...]}".into(),
            ));
        }
    };

    let now = chrono::Utc::now();
    let mut accepted = 0;
    let mut rejected = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        let validated = serde_json::from_value::<RawSample>(item)
            .map_err(|e| e.to_string())
            .and_then(|raw| raw.validate(now).map_err(|e| e.to_string()))
            .and_then(|s| {
                if state.config.is_known_service(&s.service) {
                    Ok(s)
                } else {
                    Err(SampleError::UnknownService(s.service).to_string())
                }
            });
        match validated {
            Ok(sample) => {
                if state.write_tx.send(sample).await.is_err() {
                    return Err(ApiError::Unavailable("sample writer is not running"));
                }
                accepted += 1;
            }
            Err(error) => {
                tracing::debug!(index, error = %error, "rejected sample");
                rejected.push(RejectedSample { index, error });
            }
        }
    }

    state
        .counters
        .accepted
        .fetch_add(accepted as u64, Ordering::Relaxed);
    state
        .counters
        .rejected
        .fetch_add(rejected.len() as u64, Ordering::Relaxed);

    Ok((
        StatusCode::ACCEPTED,
        Json(IngestResponse { accepted, rejected }),
    ))
}
