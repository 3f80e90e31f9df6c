use crate::domain::Event;
use crate::errors::{AppError, Result};
use redis::{aio::ConnectionManager, AsyncCommands, Client};

const QUEUE_KEY: &str = "events";

/// Broker queue: a single Redis list (`events`) shared by every producer
/// and worker. `push` is `LPUSH`, `pop` is a blocking `BRPOP` so idle
/// workers don't poll, `length` is `LLEN` for the depth gauge.
#[derive(Clone)]
pub struct BrokerQueue {
    manager: ConnectionManager,
}

impl BrokerQueue {
    pub async fn connect(url: &str) -> Result<Self> {
        tracing::info!("connecting to broker queue");

        let client = Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;

        tracing::info!("broker queue connected");

        Ok(Self { manager })
    }

    pub async fn push(&self, event: &Event) -> Result<()> {
        let payload = serde_json::to_string(event)
            .map_err(|e| AppError::Internal(format!("failed to serialize event: {e}")))?;

        let mut conn = self.manager.clone();
        conn.lpush(QUEUE_KEY, payload).await?;
        Ok(())
    }

    /// Block for up to `timeout_secs` waiting for an event. Returns `None`
    /// on timeout rather than erroring, so callers can loop without
    /// special-casing.
    pub async fn pop(&self, timeout_secs: u64) -> Result<Option<Event>> {
        let mut conn = self.manager.clone();
        let reply: Option<(String, String)> = conn.brpop(QUEUE_KEY, timeout_secs as f64).await?;

        match reply {
            Some((_, raw)) => {
                let event: Event = serde_json::from_str(&raw)
                    .map_err(|e| AppError::Internal(format!("corrupt queued event: {e}")))?;
                Ok(Some(event))
            }
            None => Ok(None),
        }
    }

    pub async fn length(&self) -> Result<u64> {
        let mut conn = self.manager.clone();
        let len: u64 = conn.llen(QUEUE_KEY).await?;
        Ok(len)
    }

    pub async fn health_check(&self) -> Result<()> {
        let mut conn = self.manager.clone();
        let _: String = conn.ping().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventPayload;
    use chrono::Utc;

    fn sample_event(event_id: &str) -> Event {
        Event {
            event_id: event_id.to_string(),
            topic: "orders".to_string(),
            source: "checkout".to_string(),
            payload: EventPayload {
                message: "order placed".to_string(),
                timestamp: Utc::now(),
                extra: Default::default(),
            },
            timestamp: Utc::now(),
        }
    }

    // Requires a running Redis instance at redis://localhost:6379.
    #[tokio::test]
    #[ignore]
    async fn push_pop_round_trips_through_redis() {
        let queue = BrokerQueue::connect("redis://localhost:6379/0").await.unwrap();
        let event = sample_event("evt-queue-test");

        queue.push(&event).await.unwrap();
        let popped = queue.pop(5).await.unwrap().expect("expected an event");

        assert_eq!(popped.event_id, event.event_id);
        assert_eq!(popped.topic, event.topic);
    }

    #[tokio::test]
    #[ignore]
    async fn pop_times_out_on_empty_queue() {
        let queue = BrokerQueue::connect("redis://localhost:6379/0").await.unwrap();
        let popped = queue.pop(1).await.unwrap();
        assert!(popped.is_none());
    }
}
