//! Tiered Memory error types.

/// Errors from tier operations.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// The State Store rejected the read or write.
    #[error(transparent)]
    Storage(#[from] arcadia_storage::StorageError),
}

/// Result type for tiered memory operations.
pub type MemoryResult<T> = Result<T, MemoryError>;
