//! Hook Pipeline error types.

/// Errors raised while running a tool invocation through the pipeline.
///
/// Most variants wrap a terminal *decision* made by one of the staged
/// components (security denial, autonomy denial, a refused or timed
/// out approval) rather than an infrastructure failure — callers match
/// on these to render the right message to the agent.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    /// The Security Gate denied the action outright (stage 1).
    #[error("blocked by security policy: {reason}")]
    SecurityDenied {
        /// Why the gate denied it.
        reason: String,
    },

    /// The Autonomy Manager's effective level is below what the
    /// invocation requires, and no approval path was available or it
    /// was refused (stage 3).
    #[error("autonomy denied: {reason}")]
    AutonomyDenied {
        /// Why the gate denied it.
        reason: String,
    },

    /// An opened Injection Point was refused by the human (or a
    /// learned auto-apply pattern) rather than approved.
    #[error("approval refused: {reason}")]
    ApprovalRefused {
        /// The human's (or pattern's) stated reason.
        reason: String,
    },

    /// An opened Injection Point was not answered before its timeout
    /// and its default-on-timeout resolved to a refusal.
    #[error("approval timed out waiting for a human response")]
    ApprovalTimedOut,

    /// The Tool Registry's dispatch failed (stage 6).
    #[error("tool execution failed: {0}")]
    ToolFailed(String),

    /// The State Store rejected a read or write.
    #[error(transparent)]
    Storage(#[from] arcadia_storage::StorageError),

    /// The Event Log rejected an append.
    #[error(transparent)]
    Events(#[from] arcadia_events::EventsError),

    /// The Checkpoint Manager failed to take a checkpoint.
    #[error(transparent)]
    Checkpoint(#[from] arcadia_checkpoint::CheckpointError),
}

/// Result type for Hook Pipeline operations.
pub type HookResult<T> = Result<T, HookError>;
