//! Security Gate error types.

/// Errors raised while configuring or validating a [`crate::SecurityPolicy`].
#[derive(Debug, thiserror::Error)]
pub enum SecurityError {
    /// A configured glob pattern (path or host) failed to compile.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Why `globset` rejected it.
        reason: String,
    },
}

/// Result type for Security Gate operations.
pub type SecurityResult<T> = Result<T, SecurityError>;
