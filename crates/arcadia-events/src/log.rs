//! The Event Log: durable sink plus live bus plus the read-side queries
//! other components run against it (§4.2).

use crate::bus::{EventBus, EventReceiver};
use crate::error::EventsResult;
use crate::event::Event;
use crate::sink::EventSink;
use arcadia_core::{EventId, SessionId};
use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};

/// Per-event-type counts, used for a session's end-of-run metrics.
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct EventMetrics {
    /// Total events appended.
    pub total: u64,
    /// Count of `TOOL_CALL` events with no matching
    /// `TOOL_RESULT`/`TOOL_ERROR`/`TOOL_BLOCKED` (should be zero at
    /// `SESSION_END`, per the invocation-correlation invariant).
    pub unresolved_tool_calls: u64,
}

/// The Event Log: one durable JSONL file plus one live broadcast bus,
/// shared across the process (§5: one event sink writer task).
pub struct EventLog {
    sink: EventSink,
    bus: EventBus,
    next_id: AtomicI64,
}

impl EventLog {
    /// Open the log at `path`, replaying existing events to seed the id
    /// counter and the bus's nothing-lost-on-restart guarantee.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing log cannot be replayed.
    pub async fn open(path: impl AsRef<Path>) -> EventsResult<Self> {
        let sink = EventSink::new(path.as_ref());
        let existing = sink.replay().await?;
        let max_id = existing.iter().map(|e| e.event_id.get()).max().unwrap_or(0);
        Ok(Self {
            sink,
            bus: EventBus::new(),
            next_id: AtomicI64::new(max_id + 1),
        })
    }

    /// Append an event: assigns it the next id, persists it durably,
    /// then publishes it to live subscribers.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable append fails.
    pub async fn append(&self, mut event: Event) -> EventsResult<Event> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        event.event_id = EventId::new(id);
        self.sink.append(&event).await?;
        self.bus.publish(event.clone());
        Ok(event)
    }

    /// Synchronous bridge for callers outside an async context (e.g. a
    /// `Drop` impl). Blocks the current thread on a fresh single-shot
    /// runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable append fails.
    pub fn append_blocking(&self, event: Event) -> EventsResult<Event> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("building a current-thread runtime cannot fail here");
        rt.block_on(self.append(event))
    }

    /// Subscribe to live events.
    #[must_use]
    pub fn subscribe(&self) -> EventReceiver {
        self.bus.subscribe()
    }

    /// Replay the full durable log.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be read.
    pub async fn iter_all(&self) -> EventsResult<Vec<Event>> {
        self.sink.replay().await
    }

    /// Replay and filter to one session's events, in append order —
    /// enough to reconstruct what happened during that session.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be read.
    pub async fn reconstruct_session(&self, session_id: SessionId) -> EventsResult<Vec<Event>> {
        let mut events = self.iter_all().await?;
        events.retain(|e| e.session_id == session_id);
        Ok(events)
    }

    /// Every event appended at or before `cutoff`, for a session — the
    /// context window visible to a resumed session.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be read.
    pub async fn context_at(
        &self,
        session_id: SessionId,
        cutoff: chrono::DateTime<chrono::Utc>,
    ) -> EventsResult<Vec<Event>> {
        let mut events = self.reconstruct_session(session_id).await?;
        events.retain(|e| e.timestamp <= cutoff);
        Ok(events)
    }

    /// Compute metrics for a session, including the tool-call
    /// correlation check (§3: every `TOOL_CALL` must eventually have a
    /// matching `TOOL_RESULT`, `TOOL_ERROR`, or `TOOL_BLOCKED`).
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be read.
    pub async fn metrics(&self, session_id: SessionId) -> EventsResult<EventMetrics> {
        use arcadia_core::EventType;
        use std::collections::HashSet;

        let events = self.reconstruct_session(session_id).await?;
        let mut pending = HashSet::new();

        for event in &events {
            let invocation_id = event
                .payload
                .get("invocation_id")
                .and_then(|v| v.as_str())
                .map(str::to_string);
            let Some(invocation_id) = invocation_id else {
                continue;
            };
            match event.event_type {
                EventType::ToolCall => {
                    pending.insert(invocation_id);
                }
                EventType::ToolResult | EventType::ToolError | EventType::ToolBlocked => {
                    pending.remove(&invocation_id);
                }
                _ => {}
            }
        }

        Ok(EventMetrics {
            total: events.len() as u64,
            unresolved_tool_calls: pending.len() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcadia_core::EventType;
    use serde_json::json;

    #[tokio::test]
    async fn append_assigns_monotonic_ids() {
        let dir = tempfile::tempdir().unwrap();
        let log = EventLog::open(dir.path().join(".events.jsonl")).await.unwrap();

        let first = log
            .append(Event::new(SessionId::new(1), EventType::SessionStart, json!({})))
            .await
            .unwrap();
        let second = log
            .append(Event::new(SessionId::new(1), EventType::ToolCall, json!({})))
            .await
            .unwrap();
        assert!(second.event_id.get() > first.event_id.get());
    }

    #[tokio::test]
    async fn reopening_resumes_id_counter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".events.jsonl");
        {
            let log = EventLog::open(&path).await.unwrap();
            log.append(Event::new(SessionId::new(1), EventType::SessionStart, json!({})))
                .await
                .unwrap();
        }
        let log = EventLog::open(&path).await.unwrap();
        let appended = log
            .append(Event::new(SessionId::new(1), EventType::SessionEnd, json!({})))
            .await
            .unwrap();
        assert!(appended.event_id.get() > 1);
    }

    #[tokio::test]
    async fn metrics_flags_unresolved_tool_call() {
        let dir = tempfile::tempdir().unwrap();
        let log = EventLog::open(dir.path().join(".events.jsonl")).await.unwrap();
        let session_id = SessionId::new(1);

        log.append(Event::new(
            session_id,
            EventType::ToolCall,
            json!({"invocation_id": "abc"}),
        ))
        .await
        .unwrap();

        let metrics = log.metrics(session_id).await.unwrap();
        assert_eq!(metrics.unresolved_tool_calls, 1);

        log.append(Event::new(
            session_id,
            EventType::ToolResult,
            json!({"invocation_id": "abc"}),
        ))
        .await
        .unwrap();

        let metrics = log.metrics(session_id).await.unwrap();
        assert_eq!(metrics.unresolved_tool_calls, 0);
    }
}
