//! The signal a caller already has about why a session ended badly,
//! handed in so the analyzer doesn't have to re-derive what the
//! watchdog (or crash recovery, or feature verification) already knows
//! for certain.

/// What triggered analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureHint {
    /// No `TOOL_CALL` was observed for the configured stall window.
    Stall,
    /// The same `(feature_id, error_hash)` pair repeated past the
    /// configured threshold.
    Cyclic {
        /// Feature in progress when the repeat was detected, if any.
        feature_id: Option<i64>,
        /// How many times it repeated.
        count: u32,
    },
    /// The agent repeatedly attempted a command the Security Gate
    /// blocks.
    BlockedCommands,
    /// The session's budget cap was reached.
    BudgetExceeded,
    /// An unterminated prior session was found on startup and a
    /// synthetic `SESSION_END` was written for it.
    Crash,
    /// A feature that previously passed verification no longer does.
    Regression {
        /// The feature that regressed.
        feature_index: i64,
    },
}

impl FailureHint {
    /// The category this hint maps to in a filed [`arcadia_storage::models::FailureReport`].
    #[must_use]
    pub fn category(&self) -> arcadia_storage::models::FailureCategory {
        use arcadia_storage::models::FailureCategory;
        match self {
            Self::Stall | Self::BudgetExceeded => FailureCategory::Timeout,
            Self::Cyclic { .. } => FailureCategory::CyclicError,
            Self::BlockedCommands => FailureCategory::BlockedCommands,
            Self::Crash => FailureCategory::Crash,
            Self::Regression { .. } => FailureCategory::Regression,
        }
    }
}
