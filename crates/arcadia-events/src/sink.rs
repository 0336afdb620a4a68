//! Durable append-only sink: one checksummed JSON line per event.
//!
//! Each line is `{"event": <Event>, "checksum": "<sha256 of the event's
//! canonical JSON>"}`. On replay, a line whose checksum does not match —
//! or that fails to parse at all — is treated as a torn write from a
//! crash mid-append and replay stops there, returning everything read
//! so far.

use crate::error::{EventsError, EventsResult};
use crate::event::Event;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(serde::Serialize, serde::Deserialize)]
struct Line {
    event: Event,
    checksum: String,
}

fn checksum_of(event: &Event) -> EventsResult<String> {
    let canonical = serde_json::to_vec(event).map_err(EventsError::Serde)?;
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    Ok(hex::encode(hasher.finalize()))
}

/// Append-only event log file.
pub struct EventSink {
    path: PathBuf,
}

impl EventSink {
    /// Point the sink at a log file path. The file is created on first
    /// append if it does not exist.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The log file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event, returning the checksummed line written.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or written.
    pub async fn append(&self, event: &Event) -> EventsResult<()> {
        let checksum = checksum_of(event)?;
        let line = Line {
            event: event.clone(),
            checksum,
        };
        let mut json = serde_json::to_vec(&line).map_err(EventsError::Serde)?;
        json.push(b'\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(EventsError::Io)?;
        file.write_all(&json).await.map_err(EventsError::Io)?;
        file.flush().await.map_err(EventsError::Io)?;
        Ok(())
    }

    /// Replay every well-formed, checksum-valid event in file order.
    ///
    /// Stops at the first line that fails to parse or whose checksum
    /// does not match (a torn write) and logs a warning rather than
    /// failing the whole replay.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file cannot be opened (a missing
    /// file replays as empty, not an error).
    pub async fn replay(&self) -> EventsResult<Vec<Event>> {
        let file = match tokio::fs::File::open(&self.path).await {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(EventsError::Io(e)),
        };

        let mut reader = BufReader::new(file).lines();
        let mut events = Vec::new();
        while let Some(raw) = reader.next_line().await.map_err(EventsError::Io)? {
            if raw.trim().is_empty() {
                continue;
            }
            let Ok(line) = serde_json::from_str::<Line>(&raw) else {
                tracing::warn!("event log replay stopped: unparsable line");
                break;
            };
            let Ok(expected) = checksum_of(&line.event) else {
                break;
            };
            if expected != line.checksum {
                tracing::warn!("event log replay stopped: checksum mismatch (torn write)");
                break;
            }
            events.push(line.event);
        }
        Ok(events)
    }
}
