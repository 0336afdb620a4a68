//! Failure Analyzer error types.

/// Errors from analyzing a session's failure.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// The Event Log could not be read.
    #[error(transparent)]
    Events(#[from] arcadia_events::EventsError),

    /// The State Store rejected the read or write.
    #[error(transparent)]
    Storage(#[from] arcadia_storage::StorageError),
}

/// Result type for analyzer operations.
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;
