use axum::{extract::State, Json};
use serde_json::json;

use crate::api::routes::AppState;
use crate::domain::{AuditAction, PublishRequest};
use crate::errors::{AppError, Result};
use crate::observability::MetricsRecorder;
use crate::store::audit::log_audit;

/// POST /publish - validate the whole batch, then push each event through
/// RECEIVED -> push -> QUEUED in order. An empty batch is a no-op success.
/// A mid-batch infrastructure failure is not rolled back: events already
/// pushed stay queued, matching the at-least-once delivery this service
/// promises downstream of the broker.
pub async fn publish_events(
    State(state): State<AppState>,
    Json(request): Json<PublishRequest>,
) -> Result<Json<serde_json::Value>> {
    for event in &request.events {
        event.validate()?;
    }

    for event in &request.events {
        log_audit(
            &state.db_pool,
            &event.event_id,
            &event.topic,
            &event.source,
            AuditAction::Received,
            None,
        )
        .await?;

        MetricsRecorder::record_event_received();

        state.queue.push(event).await.map_err(|e| {
            AppError::Internal(format!("failed to publish event to queue: {e}"))
        })?;

        log_audit(
            &state.db_pool,
            &event.event_id,
            &event.topic,
            &event.source,
            AuditAction::Queued,
            None,
        )
        .await?;
    }

    tracing::info!("published {} events to queue", request.events.len());

    Ok(Json(json!({
        "status": "success",
        "message": format!("Published {} events", request.events.len()),
        "events_count": request.events.len(),
    })))
}
