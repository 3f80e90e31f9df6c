use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sqlx::PgPool;
use tokio::task::JoinHandle;

use crate::domain::Event;
use crate::observability::MetricsRecorder;
use crate::queue::BrokerQueue;
use crate::store::events::{self, InsertOutcome};

const POP_TIMEOUT_SECS: u64 = 5;
const MAX_RETRIES: u32 = 5;
const MAX_BACKOFF_SECS: u64 = 30;

/// Pool of workers pulling events off the broker queue and writing them
/// into the event store. Each worker runs its own task and its own
/// retry/backoff state; `stop` cancels all of them cooperatively.
pub struct ConsumerPool {
    running: Arc<AtomicBool>,
    handles: Vec<JoinHandle<()>>,
}

impl ConsumerPool {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            handles: Vec::new(),
        }
    }

    pub fn start(&mut self, worker_count: usize, pool: PgPool, queue: BrokerQueue) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        for worker_id in 0..worker_count {
            let running = Arc::clone(&self.running);
            let pool = pool.clone();
            let queue = queue.clone();

            self.handles
                .push(tokio::spawn(consume_loop(worker_id, running, pool, queue)));
        }

        tracing::info!("started {worker_count} consumer workers");
    }

    /// Signal every worker to stop and wait for them to drain their
    /// current iteration. Workers check `running` once per loop, so this
    /// returns once each has finished whatever it was doing.
    pub async fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);

        for handle in self.handles.drain(..) {
            if let Err(e) = handle.await {
                tracing::error!("consumer worker task panicked: {e}");
            }
        }

        tracing::info!("all consumer workers stopped");
    }
}

impl Default for ConsumerPool {
    fn default() -> Self {
        Self::new()
    }
}

async fn consume_loop(worker_id: usize, running: Arc<AtomicBool>, pool: PgPool, queue: BrokerQueue) {
    let mut retry_count: u32 = 0;

    while running.load(Ordering::SeqCst) {
        let popped = match queue.pop(POP_TIMEOUT_SECS).await {
            Ok(popped) => popped,
            Err(e) => {
                handle_worker_error(worker_id, &mut retry_count, &format!("queue pop failed: {e}"))
                    .await;
                continue;
            }
        };

        let event = match popped {
            Some(event) => event,
            None => continue,
        };

        retry_count = 0;

        if let Err(e) = process_event(worker_id, &pool, &event).await {
            tracing::error!(
                "worker {worker_id}: error processing event_id={} topic={} - {e}",
                event.event_id,
                event.topic,
            );

            if let Err(audit_err) = events::record_failure(&pool, &event, Some(worker_id as i32)).await {
                tracing::error!("worker {worker_id}: failed to record FAILED audit entry: {audit_err}");
            }

            handle_worker_error(worker_id, &mut retry_count, &e.to_string()).await;
        }
    }
}

async fn process_event(worker_id: usize, pool: &PgPool, event: &Event) -> crate::errors::Result<()> {
    let outcome = events::insert_event(pool, event, Some(worker_id as i32)).await?;

    match outcome {
        InsertOutcome::Inserted => {
            MetricsRecorder::record_event_processed();
            tracing::info!(
                "worker {worker_id}: processed unique event - event_id={} topic={}",
                event.event_id,
                event.topic,
            );
        }
        InsertOutcome::Duplicate => {
            MetricsRecorder::record_event_duplicated();
            tracing::warn!(
                "worker {worker_id}: duplicate event dropped - event_id={} topic={}",
                event.event_id,
                event.topic,
            );
        }
    }

    Ok(())
}

fn backoff_seconds(retry_count: u32) -> u64 {
    2u64.saturating_pow(retry_count).min(MAX_BACKOFF_SECS)
}

async fn handle_worker_error(worker_id: usize, retry_count: &mut u32, reason: &str) {
    *retry_count += 1;
    let backoff_secs = backoff_seconds(*retry_count);

    tracing::error!(
        "worker {worker_id}: {reason}, retry {retry_count}/{MAX_RETRIES}, backoff {backoff_secs}s",
    );

    MetricsRecorder::record_worker_backoff(worker_id);

    if *retry_count >= MAX_RETRIES {
        tracing::error!("worker {worker_id}: max retries exceeded, continuing");
        *retry_count = 0;
    }

    tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_then_caps_at_thirty_seconds() {
        assert_eq!(backoff_seconds(1), 2);
        assert_eq!(backoff_seconds(2), 4);
        assert_eq!(backoff_seconds(3), 8);
        assert_eq!(backoff_seconds(4), 16);
        assert_eq!(backoff_seconds(5), 30);
        assert_eq!(backoff_seconds(6), 30);
    }
}
