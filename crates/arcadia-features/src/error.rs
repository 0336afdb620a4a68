//! Feature Registry error types.

/// Errors from registry operations, re-exporting the storage layer's
/// invariant violations (F1/F2) so callers only need one error type.
#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    /// The State Store rejected the read or write.
    #[error(transparent)]
    Storage(#[from] arcadia_storage::StorageError),
}

/// Result type for registry operations.
pub type FeatureResult<T> = Result<T, FeatureError>;
