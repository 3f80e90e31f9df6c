use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::api::routes::AppState;
use crate::observability::MetricsRecorder;

/// GET / - service banner, kept for parity with simple uptime checks.
pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Chronicle aggregator is running..." }))
}

/// GET /health - liveness: the process is up and serving requests.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

/// GET /ready - readiness: the event store and broker queue both answer.
#[tracing::instrument(skip(state))]
pub async fn ready(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let status = state.health_checker.readiness().await;

    if status.status == "ok" {
        Ok(Json(json!({ "status": "ready" })))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

/// GET /metrics - Prometheus text exposition.
pub async fn metrics() -> Result<String, StatusCode> {
    MetricsRecorder::export().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}
