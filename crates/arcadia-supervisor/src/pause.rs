//! The `.paused_session.json` snapshot a session leaves behind when it
//! pauses instead of completing (§4.11), and `RESUMING` reads back in
//! on the next start.
//!
//! Grounded on `astrid-runtime/src/session.rs`'s `SerializableSession`
//! (a plain serde struct written to disk on pause and read back to
//! reconstruct the in-memory session), trimmed to the handful of
//! fields the supervisor actually needs to resume rather than the
//! full session transcript — the Event Log already holds that.

use std::path::Path;

use arcadia_core::{CheckpointId, SessionId};
use serde::{Deserialize, Serialize};

use crate::error::SupervisorResult;

/// Everything `RESUMING` needs to pick a paused session back up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PausedSession {
    /// The session that paused.
    pub session_id: SessionId,
    /// The feature it was working on when it paused, if any.
    pub current_feature: Option<i64>,
    /// The last checkpoint taken before pausing, if any.
    pub last_checkpoint_id: Option<CheckpointId>,
    /// Prompt text to prepend to the next `PREP` phase, summarizing
    /// where this session left off.
    pub resume_prompt: String,
    /// Why the session paused (signal, explicit injection, watchdog).
    pub pause_reason: String,
    /// Freeform notes a human left for whoever resumes this session.
    pub human_notes: Option<String>,
}

impl PausedSession {
    /// Write this snapshot to `path`, replacing any existing one.
    pub fn save(&self, path: &Path) -> SupervisorResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read a snapshot back, if one exists at `path`.
    pub fn load(path: &Path) -> SupervisorResult<Option<Self>> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove the snapshot at `path` once it's been adopted.
    pub fn remove(path: &Path) -> SupervisorResult<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PausedSession {
        PausedSession {
            session_id: SessionId::new(7),
            current_feature: Some(3),
            last_checkpoint_id: Some(CheckpointId::new(12)),
            resume_prompt: "continue wiring the login form".to_string(),
            pause_reason: "human requested pause".to_string(),
            human_notes: Some("double check the CSRF token handling".to_string()),
        }
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".paused_session.json");
        sample().save(&path).unwrap();

        let loaded = PausedSession::load(&path).unwrap().unwrap();
        assert_eq!(loaded.session_id, SessionId::new(7));
        assert_eq!(loaded.current_feature, Some(3));
        assert_eq!(loaded.human_notes.as_deref(), Some("double check the CSRF token handling"));
    }

    #[test]
    fn load_with_no_file_present_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        assert!(PausedSession::load(&path).unwrap().is_none());
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".paused_session.json");
        sample().save(&path).unwrap();
        PausedSession::remove(&path).unwrap();
        PausedSession::remove(&path).unwrap();
        assert!(PausedSession::load(&path).unwrap().is_none());
    }
}
