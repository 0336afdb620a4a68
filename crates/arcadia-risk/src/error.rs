//! Risk Classifier error types.

/// Errors from Risk Classifier operations.
#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    /// A configured risk pattern's glob failed to compile and its
    /// fallback prefix match also could not be applied.
    #[error("invalid risk pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Result type for Risk Classifier operations.
pub type RiskResult<T> = Result<T, RiskError>;
