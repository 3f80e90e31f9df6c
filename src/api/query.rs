use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::routes::AppState;
use crate::domain::{AuditLogFilter, AuditSummary, Event, Stats};
use crate::errors::Result;
use crate::store::{audit, events};

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub topic: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub count: usize,
    pub events: Vec<Event>,
}

/// GET /events?topic= - all events, or just one topic's, newest first.
pub async fn get_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<EventsResponse>> {
    let persisted = match query.topic {
        Some(topic) => events::get_events_by_topic(&state.db_pool, &topic).await?,
        None => events::get_all_events(&state.db_pool).await?,
    };

    let events = persisted
        .into_iter()
        .map(|p| p.into_event())
        .collect::<Result<Vec<_>>>()?;

    Ok(Json(EventsResponse {
        count: events.len(),
        events,
    }))
}

/// GET /stats - running counters plus the distinct set of topics seen.
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Stats>> {
    let stats = events::get_stats(&state.db_pool, state.start_time).await?;
    Ok(Json(stats))
}

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub action: Option<String>,
    pub topic: Option<String>,
    pub event_id: Option<String>,
    #[serde(rename = "from")]
    pub from: Option<DateTime<Utc>>,
    #[serde(rename = "to")]
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AuditLogResponse {
    pub count: usize,
    pub audit_logs: Vec<crate::domain::AuditRecord>,
}

/// GET /audit?action=&topic=&event_id=&from=&to=&limit= - filtered audit trail.
pub async fn get_audit_logs(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<AuditLogResponse>> {
    let filter = AuditLogFilter {
        action: query.action,
        topic: query.topic,
        event_id: query.event_id,
        from: query.from,
        to: query.to,
        limit: query.limit,
    };

    let audit_logs = audit::get_audit_logs(&state.db_pool, &filter).await?;

    Ok(Json(AuditLogResponse {
        count: audit_logs.len(),
        audit_logs,
    }))
}

/// GET /audit/summary - totals by action, and per-topic/per-worker breakdowns.
pub async fn get_audit_summary(State(state): State<AppState>) -> Result<Json<AuditSummary>> {
    let summary = audit::get_audit_summary(&state.db_pool).await?;
    Ok(Json(summary))
}
