//! Checkpoint Manager error types.

/// Errors from taking or restoring a checkpoint.
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    /// A `git` invocation could not be spawned.
    #[error("failed to run git: {0}")]
    Io(#[from] std::io::Error),

    /// `git` ran but exited non-zero.
    #[error("git {command} failed: {stderr}")]
    GitFailed {
        /// The git subcommand that failed, e.g. `"commit"`.
        command: String,
        /// Captured stderr.
        stderr: String,
    },

    /// The State Store rejected the read or write.
    #[error(transparent)]
    Storage(#[from] arcadia_storage::StorageError),

    /// `rollback_to` was given a checkpoint id that doesn't exist.
    #[error("no checkpoint with id {0}")]
    NotFound(i64),
}

/// Result type for checkpoint operations.
pub type CheckpointResult<T> = Result<T, CheckpointError>;
