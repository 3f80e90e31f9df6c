use serde::{Deserialize, Serialize};

/// `GET /stats` response. `unique_processed` is always derived at query
/// time as `COUNT(*)` over `processed_events`, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub received: i64,
    pub unique_processed: i64,
    pub duplicated_dropped: i64,
    pub topics: Vec<String>,
    pub uptime: i64,
}
