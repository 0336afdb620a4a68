//! The state machine a session moves through (§4.11):
//!
//! ```text
//! INIT -> RESUMING? -> PREP -> RUN -> SETTLE -> END
//!                               ^
//!                               `- STALL/CYCLIC/BUDGET watchdog
//! ```

use arcadia_core::CheckpointId;

/// One phase of a session's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    /// Create the Session row, append `SESSION_START`, take the
    /// `SessionStart` checkpoint.
    Init,
    /// Check for a paused-session snapshot and adopt it if present.
    Resuming,
    /// Compose the turn's prompt from memory, features, and issues.
    Prep,
    /// Hand the prompt to the agent runtime and drive tool calls
    /// through the Hook Pipeline.
    Run,
    /// Synthesize the session summary, file a failure report if the
    /// watchdog flagged one, take the `SessionEnd` checkpoint.
    Settle,
    /// Persist the final Session row status.
    End,
}

/// Why a watchdog interrupted `RUN`.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchdogFlag {
    /// No `TOOL_CALL` was emitted for the configured stall timeout.
    Stall,
    /// The same `(feature_id, error_hash)` pair repeated at least the
    /// configured threshold within the rolling window.
    Cyclic {
        /// The feature the repeating failure concerns, if any.
        feature_id: Option<i64>,
        /// Hash of the repeating error text.
        error_hash: u64,
        /// How many times it repeated.
        count: u32,
    },
    /// Cumulative token cost reached the session's budget cap.
    BudgetExceeded,
}

/// How a session's `RUN` phase concluded, decided before `SETTLE` runs.
#[derive(Debug, Clone)]
pub enum SessionOutcome {
    /// The runtime finished its work normally (it stopped emitting
    /// tool calls / requesting further turns).
    Completed,
    /// A watchdog interrupted the run.
    Watchdog(WatchdogFlag),
    /// A pause was requested (signal, or an explicit injection).
    Paused {
        /// Why the session is pausing.
        reason: String,
        /// Human-readable notes to carry into the resume prompt.
        notes: Option<String>,
    },
}

/// What `SETTLE` produced for `END` to persist, plus bookkeeping
/// `RESUMING` would need on a future restart.
#[derive(Debug, Clone, Default)]
pub struct SettleResult {
    /// The most recent checkpoint taken this session, if any.
    pub last_checkpoint_id: Option<CheckpointId>,
    /// The feature the session was last working on, if any.
    pub current_feature: Option<i64>,
}
