use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One state transition an event undergoes on its way through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Received,
    Queued,
    Processed,
    Dropped,
    Failed,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Received => "RECEIVED",
            AuditAction::Queued => "QUEUED",
            AuditAction::Processed => "PROCESSED",
            AuditAction::Dropped => "DROPPED",
            AuditAction::Failed => "FAILED",
        }
    }
}

impl std::str::FromStr for AuditAction {
    type Err = crate::errors::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RECEIVED" => Ok(AuditAction::Received),
            "QUEUED" => Ok(AuditAction::Queued),
            "PROCESSED" => Ok(AuditAction::Processed),
            "DROPPED" => Ok(AuditAction::Dropped),
            "FAILED" => Ok(AuditAction::Failed),
            other => Err(crate::errors::AppError::Validation(format!(
                "unknown audit action: {other}"
            ))),
        }
    }
}

/// One row of the append-only audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: i64,
    pub event_id: String,
    pub topic: String,
    pub source: String,
    pub action: AuditAction,
    pub worker_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Optional filters accepted by `GET /audit`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditLogFilter {
    pub action: Option<String>,
    pub topic: Option<String>,
    pub event_id: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
}

/// Per-bucket counts by action, used both per-topic and per-worker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditSummaryBucket {
    #[serde(default)]
    pub received: i64,
    #[serde(default)]
    pub queued: i64,
    #[serde(default)]
    pub processed: i64,
    #[serde(default)]
    pub dropped: i64,
    #[serde(default)]
    pub failed: i64,
}

impl AuditSummaryBucket {
    fn add(&mut self, action: AuditAction, count: i64) {
        match action {
            AuditAction::Received => self.received = count,
            AuditAction::Queued => self.queued = count,
            AuditAction::Processed => self.processed = count,
            AuditAction::Dropped => self.dropped = count,
            AuditAction::Failed => self.failed = count,
        }
    }
}

/// `GET /audit/summary` response: totals by action, per-topic and
/// per-worker breakdowns. The worker dimension only ever records the
/// three terminal actions (processed/dropped/failed) since pre-queue
/// actions are written before a worker is assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSummary {
    pub total_received: i64,
    pub total_queued: i64,
    pub total_processed: i64,
    pub total_dropped: i64,
    pub total_failed: i64,
    pub by_topic: HashMap<String, AuditSummaryBucket>,
    pub by_worker: HashMap<String, AuditSummaryBucket>,
}

impl AuditSummary {
    pub fn from_rows(
        totals: Vec<(AuditAction, i64)>,
        by_topic: Vec<(String, AuditAction, i64)>,
        by_worker: Vec<(i32, AuditAction, i64)>,
    ) -> Self {
        let mut summary = AuditSummary {
            total_received: 0,
            total_queued: 0,
            total_processed: 0,
            total_dropped: 0,
            total_failed: 0,
            by_topic: HashMap::new(),
            by_worker: HashMap::new(),
        };

        for (action, count) in totals {
            match action {
                AuditAction::Received => summary.total_received = count,
                AuditAction::Queued => summary.total_queued = count,
                AuditAction::Processed => summary.total_processed = count,
                AuditAction::Dropped => summary.total_dropped = count,
                AuditAction::Failed => summary.total_failed = count,
            }
        }

        for (topic, action, count) in by_topic {
            summary
                .by_topic
                .entry(topic)
                .or_insert_with(AuditSummaryBucket::default)
                .add(action, count);
        }

        for (worker_id, action, count) in by_worker {
            summary
                .by_worker
                .entry(worker_id.to_string())
                .or_insert_with(AuditSummaryBucket::default)
                .add(action, count);
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_round_trips_through_str() {
        for action in [
            AuditAction::Received,
            AuditAction::Queued,
            AuditAction::Processed,
            AuditAction::Dropped,
            AuditAction::Failed,
        ] {
            let parsed: AuditAction = action.as_str().parse().unwrap();
            assert_eq!(parsed, action);
        }
    }

    #[test]
    fn summary_aggregates_totals_and_buckets() {
        let summary = AuditSummary::from_rows(
            vec![
                (AuditAction::Received, 10),
                (AuditAction::Processed, 7),
                (AuditAction::Dropped, 3),
            ],
            vec![
                ("t1".to_string(), AuditAction::Received, 6),
                ("t1".to_string(), AuditAction::Processed, 5),
                ("t2".to_string(), AuditAction::Dropped, 2),
            ],
            vec![
                (0, AuditAction::Processed, 4),
                (1, AuditAction::Failed, 1),
            ],
        );

        assert_eq!(summary.total_received, 10);
        assert_eq!(summary.total_processed, 7);
        assert_eq!(summary.by_topic["t1"].received, 6);
        assert_eq!(summary.by_topic["t1"].processed, 5);
        assert_eq!(summary.by_topic["t2"].dropped, 2);
        assert_eq!(summary.by_worker["0"].processed, 4);
        assert_eq!(summary.by_worker["1"].failed, 1);
    }
}
