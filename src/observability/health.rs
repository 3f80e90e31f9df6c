use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::queue::BrokerQueue;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthChecks {
    pub database: ComponentStatus,
    pub queue: ComponentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub status: String,
    pub message: Option<String>,
}

pub struct HealthChecker {
    db_pool: PgPool,
    queue: BrokerQueue,
}

impl HealthChecker {
    pub fn new(db_pool: PgPool, queue: BrokerQueue) -> Self {
        Self { db_pool, queue }
    }

    /// Liveness check — is the process running at all?
    pub async fn liveness(&self) -> HealthStatus {
        HealthStatus {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            checks: HealthChecks {
                database: ComponentStatus {
                    status: "unknown".to_string(),
                    message: None,
                },
                queue: ComponentStatus {
                    status: "unknown".to_string(),
                    message: None,
                },
            },
        }
    }

    /// Readiness check — can the service reach its event store and broker queue?
    pub async fn readiness(&self) -> HealthStatus {
        let db_status = self.check_database().await;
        let queue_status = self.check_queue().await;

        let overall_status = if db_status.status == "ok" && queue_status.status == "ok" {
            "ok"
        } else {
            "degraded"
        };

        HealthStatus {
            status: overall_status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            checks: HealthChecks {
                database: db_status,
                queue: queue_status,
            },
        }
    }

    async fn check_database(&self) -> ComponentStatus {
        match crate::store::health_check(&self.db_pool).await {
            Ok(_) => ComponentStatus {
                status: "ok".to_string(),
                message: None,
            },
            Err(e) => ComponentStatus {
                status: "error".to_string(),
                message: Some(format!("database check failed: {e}")),
            },
        }
    }

    async fn check_queue(&self) -> ComponentStatus {
        match self.queue.health_check().await {
            Ok(_) => ComponentStatus {
                status: "ok".to_string(),
                message: None,
            },
            Err(e) => ComponentStatus {
                status: "error".to_string(),
                message: Some(format!("queue check failed: {e}")),
            },
        }
    }
}
