use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, Result};

/// Payload carried by an event: a required `message`, a required
/// ISO-8601 `timestamp`, and any extra fields kept verbatim (open schema).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventPayload {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// An event submitted by a producer, keyed by `(topic, event_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event_id: String,
    pub topic: String,
    pub source: String,
    pub payload: EventPayload,
    pub timestamp: DateTime<Utc>,
}

impl Event {
    /// Validate the fields the transport layer is responsible for:
    /// required strings non-empty, timestamps already parsed as ISO-8601
    /// by serde/chrono during deserialization.
    pub fn validate(&self) -> Result<()> {
        if self.event_id.trim().is_empty() {
            return Err(AppError::Validation("event_id must not be empty".into()));
        }
        if self.source.trim().is_empty() {
            return Err(AppError::Validation("source must not be empty".into()));
        }
        if self.payload.message.trim().is_empty() {
            return Err(AppError::Validation(
                "payload.message must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// A batch publish request: `{events: [Event, ...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishRequest {
    pub events: Vec<Event>,
}

/// An `Event` once durably written, with its assigned id and ingest time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PersistedEvent {
    pub id: i64,
    pub event_id: String,
    pub topic: String,
    pub source: String,
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl PersistedEvent {
    /// Reconstruct the wire-format `Event` from a stored row.
    pub fn into_event(self) -> Result<Event> {
        let payload: EventPayload = serde_json::from_value(self.payload)
            .map_err(|e| AppError::Internal(format!("corrupt stored payload: {e}")))?;

        Ok(Event {
            event_id: self.event_id,
            topic: self.topic,
            source: self.source,
            payload,
            timestamp: self.timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_keeps_extra_fields_verbatim() {
        let v = json!({
            "message": "hello",
            "timestamp": "2026-01-01T00:00:00Z",
            "region": "us-east-1",
            "retries": 3
        });
        let payload: EventPayload = serde_json::from_value(v).unwrap();
        assert_eq!(payload.message, "hello");
        assert_eq!(payload.extra.get("region").unwrap(), "us-east-1");
        assert_eq!(payload.extra.get("retries").unwrap(), 3);
    }

    #[test]
    fn validate_rejects_empty_event_id() {
        let event = Event {
            event_id: "  ".to_string(),
            topic: "t".to_string(),
            source: "s".to_string(),
            payload: EventPayload {
                message: "m".to_string(),
                timestamp: Utc::now(),
                extra: Default::default(),
            },
            timestamp: Utc::now(),
        };
        assert!(event.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_message() {
        let event = Event {
            event_id: "e1".to_string(),
            topic: "t".to_string(),
            source: "s".to_string(),
            payload: EventPayload {
                message: "   ".to_string(),
                timestamp: Utc::now(),
                extra: Default::default(),
            },
            timestamp: Utc::now(),
        };
        assert!(event.validate().is_err());
    }
}
