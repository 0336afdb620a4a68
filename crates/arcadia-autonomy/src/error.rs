//! Autonomy gate error types.

/// Errors from autonomy configuration.
#[derive(Debug, thiserror::Error)]
pub enum AutonomyError {
    /// A threshold was configured outside its valid range.
    #[error("invalid autonomy configuration: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected.
        reason: String,
    },
}

/// Result type for autonomy configuration operations.
pub type AutonomyResult<T> = Result<T, AutonomyError>;
