//! Event Log error types.

/// Errors from Event Log operations.
#[derive(Debug, thiserror::Error)]
pub enum EventsError {
    /// The sink's backing file could not be read or written.
    #[error("event log I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An event failed to serialize or deserialize.
    #[error("event log serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type for Event Log operations.
pub type EventsResult<T> = Result<T, EventsError>;
