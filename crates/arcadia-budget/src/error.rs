//! Budget tracking error types.

/// Errors from budget operations.
#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    /// A snapshot could not be restored because its configuration was
    /// invalid (e.g. a non-positive session cap).
    #[error("invalid budget configuration: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected.
        reason: String,
    },
}

/// Result type for budget configuration operations. Named distinctly
/// from [`crate::BudgetResult`], which is the tracker's check outcome,
/// not a `std::result::Result`.
pub type BudgetOpResult<T> = Result<T, BudgetError>;
