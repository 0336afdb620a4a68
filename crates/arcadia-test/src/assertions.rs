//! Event Log assertion helpers: check that a session's recorded
//! events match an expected tag sequence, without a test having to
//! hand-roll the `Vec<EventType>` comparison each time.

use arcadia_core::{EventType, SessionId};
use arcadia_events::EventLog;

/// Assert that `session_id`'s events in `log`, in append order, have
/// exactly the event types in `expected`.
///
/// # Panics
///
/// Panics (via `assert_eq!`) if the recorded sequence doesn't match.
///
/// # Errors
///
/// Returns an error if the log cannot be read.
pub async fn assert_event_sequence(
    log: &EventLog,
    session_id: SessionId,
    expected: &[EventType],
) -> Result<(), arcadia_events::EventsError> {
    let events = log.reconstruct_session(session_id).await?;
    let actual: Vec<EventType> = events.iter().map(|e| e.event_type).collect();
    assert_eq!(actual, expected, "event sequence for session {session_id} did not match");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcadia_events::Event;

    #[tokio::test]
    async fn matches_an_exact_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let log = EventLog::open(dir.path().join(".events.jsonl")).await.unwrap();
        let session_id = SessionId::new(1);
        log.append(Event::new(session_id, EventType::SessionStart, serde_json::json!({})))
            .await
            .unwrap();
        log.append(Event::new(session_id, EventType::ToolCall, serde_json::json!({})))
            .await
            .unwrap();

        assert_event_sequence(&log, session_id, &[EventType::SessionStart, EventType::ToolCall])
            .await
            .unwrap();
    }

    #[tokio::test]
    #[should_panic(expected = "did not match")]
    async fn panics_on_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let log = EventLog::open(dir.path().join(".events.jsonl")).await.unwrap();
        let session_id = SessionId::new(1);
        log.append(Event::new(session_id, EventType::SessionStart, serde_json::json!({})))
            .await
            .unwrap();

        assert_event_sequence(&log, session_id, &[EventType::ToolCall]).await.unwrap();
    }
}
