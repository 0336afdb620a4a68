//! The Event row itself (§3).

use arcadia_core::{EventId, EventType, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row appended to the Event Log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Event id, assigned by the log on append.
    pub event_id: EventId,
    /// Owning session.
    pub session_id: SessionId,
    /// When it was appended.
    pub timestamp: DateTime<Utc>,
    /// Event type tag.
    pub event_type: EventType,
    /// Structured payload, shaped per `event_type`.
    pub payload: serde_json::Value,
}

impl Event {
    /// Build an event with `event_id` left unassigned (`EventId(0)`);
    /// [`crate::EventLog::append`] assigns the real id.
    #[must_use]
    pub fn new(session_id: SessionId, event_type: EventType, payload: serde_json::Value) -> Self {
        Self {
            event_id: EventId::new(0),
            session_id,
            timestamp: Utc::now(),
            event_type,
            payload,
        }
    }
}
