use std::sync::Arc;
use std::time::Instant;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api::{health, publish, query};
use crate::observability::HealthChecker;
use crate::queue::BrokerQueue;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub queue: BrokerQueue,
    pub health_checker: Arc<HealthChecker>,
    pub start_time: Instant,
}

pub fn create_router(db_pool: PgPool, queue: BrokerQueue) -> Router {
    let health_checker = Arc::new(HealthChecker::new(db_pool.clone(), queue.clone()));

    let state = AppState {
        db_pool,
        queue,
        health_checker,
        start_time: Instant::now(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/metrics", get(health::metrics))
        .route("/publish", post(publish::publish_events))
        .route("/events", get(query::get_events))
        .route("/stats", get(query::get_stats))
        .route("/audit", get(query::get_audit_logs))
        .route("/audit/summary", get(query::get_audit_summary))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
