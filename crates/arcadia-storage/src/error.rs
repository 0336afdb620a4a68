//! Storage error types.

/// Errors from State Store operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested row was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A storage operation failed for a reason not covered by a more
    /// specific variant.
    #[error("storage error: {0}")]
    Internal(String),

    /// Connection to the storage backend failed.
    #[error("connection error: {0}")]
    Connection(String),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The namespace or key is invalid.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Invariant F1 was violated: `passes = true` with no verification
    /// artifact and `skip_verification` unset.
    #[error("feature {index} has no verification artifacts and skip_verification was not set")]
    MissingEvidence {
        /// The feature index.
        index: i64,
    },

    /// Invariant F2 was violated: `blocked_by` is non-empty while
    /// `passes = true`.
    #[error("feature {index} cannot pass while blocked_by is non-empty")]
    BlockedFeatureCannotPass {
        /// The feature index.
        index: i64,
    },

    /// Adding a `blocked_by`/`blocks` edge would create a cycle in the
    /// feature DAG.
    #[error("adding blocked_by edge {from} -> {to} would create a cycle")]
    CyclicDependency {
        /// The feature that would gain the edge.
        from: i64,
        /// The feature it would depend on.
        to: i64,
    },
}

impl From<surrealdb::Error> for StorageError {
    fn from(err: surrealdb::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
