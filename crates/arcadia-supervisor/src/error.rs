//! Error taxonomy for the Session Supervisor.

/// Everything that can go wrong driving one session through its state
/// machine.
#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    /// The State Store failed.
    #[error("storage error: {0}")]
    Storage(#[from] arcadia_storage::StorageError),

    /// The Event Log failed.
    #[error("event log error: {0}")]
    Events(#[from] arcadia_events::EventsError),

    /// The Checkpoint Manager failed.
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] arcadia_checkpoint::CheckpointError),

    /// Tiered Memory failed.
    #[error("memory error: {0}")]
    Memory(#[from] arcadia_memory::MemoryError),

    /// The Feature Registry failed.
    #[error("feature error: {0}")]
    Feature(#[from] arcadia_features::FeatureError),

    /// The Hook Pipeline's stage sequence failed.
    #[error("hook pipeline error: {0}")]
    Hooks(#[from] arcadia_hooks::HookError),

    /// A paused-session snapshot could not be read or written.
    #[error("paused session I/O failed: {0}")]
    PausedSessionIo(#[from] std::io::Error),

    /// A paused-session snapshot was malformed.
    #[error("paused session snapshot is malformed: {0}")]
    PausedSessionFormat(#[from] serde_json::Error),

    /// Another supervisor process already holds `.arcadia/supervisor.lock`.
    #[error("another supervisor is already running for this project (pid {held_by})")]
    AlreadyRunning {
        /// The pid recorded in the lock file.
        held_by: u32,
    },

    /// The agent runtime returned an error for a turn.
    #[error("agent runtime error: {0}")]
    Runtime(String),
}

/// Convenience alias for supervisor results.
pub type SupervisorResult<T> = Result<T, SupervisorError>;
