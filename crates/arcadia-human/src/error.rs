//! Error taxonomy for the Human Channel.

/// Everything that can go wrong opening, polling, or resolving an
/// Injection Point, or recording/learning an Intervention.
#[derive(Debug, thiserror::Error)]
pub enum HumanError {
    /// The backing state store failed.
    #[error("storage error: {0}")]
    Storage(#[from] arcadia_storage::StorageError),
}

/// Convenience alias for Human Channel results.
pub type HumanResult<T> = Result<T, HumanError>;
