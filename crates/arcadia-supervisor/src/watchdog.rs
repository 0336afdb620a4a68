//! Stall, cyclic-failure, and budget watchdogs for a session's `RUN`
//! phase (§4.13).
//!
//! `arcadia-budget` deliberately tracks only the dollar half of this;
//! its own doc comment disclaims the stall half, since a single
//! timestamp comparison doesn't warrant a dedicated type there. This
//! module is the supervisor's own timer/rolling-window tracking for
//! the other two flags, fed by the same `TOOL_CALL`/`TOOL_ERROR`
//! events the Hook Pipeline already appends. Grounded on
//! `astrid-runtime/src/runtime/execution.rs`'s turn-loop idea of
//! checking liveness between turns rather than inside one, adapted
//! from a per-turn token-count check into a wall-clock/rolling-window
//! check since this system's turns are agent-driven rather than fixed
//! in size.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use arcadia_budget::BudgetTracker;

use crate::state::WatchdogFlag;

/// Configuration for the three watchdog checks.
#[derive(Debug, Clone)]
pub struct WatchdogConfig {
    /// How long `RUN` may go without a `TOOL_CALL` before it's
    /// considered stalled.
    pub stall_timeout: Duration,
    /// How many repeats of the same `(feature, error)` pair within
    /// `cyclic_window` count as a cyclic failure.
    pub cyclic_threshold: u32,
    /// How many of the most recent failures are considered when
    /// looking for a repeat.
    pub cyclic_window: usize,
}

impl Default for WatchdogConfig {
    /// 10 minute stall timeout, 3 repeats within the last 10 failures.
    fn default() -> Self {
        Self {
            stall_timeout: Duration::from_secs(600),
            cyclic_threshold: 3,
            cyclic_window: 10,
        }
    }
}

/// One observed tool failure, fed to the cyclic-failure detector.
#[derive(Debug, Clone)]
pub struct FailureSample {
    /// The feature in progress when the failure occurred, if any.
    pub feature_id: Option<i64>,
    /// Hash of the error text (callers hash with a fixed hasher so
    /// equal text always hashes equal across the process's lifetime).
    pub error_hash: u64,
}

/// Tracks liveness, repeated failures, and budget across one session's
/// `RUN` phase. Not thread-safe by itself — the supervisor owns one
/// per session and feeds it from the single task driving that
/// session's turn loop.
pub struct Watchdog {
    config: WatchdogConfig,
    last_tool_call: Instant,
    failures: VecDeque<FailureSample>,
}

impl Watchdog {
    /// Start a fresh watchdog, with the stall clock starting now.
    #[must_use]
    pub fn new(config: WatchdogConfig) -> Self {
        Self { config, last_tool_call: Instant::now(), failures: VecDeque::new() }
    }

    /// Reset the stall clock — call this whenever `TOOL_CALL` fires.
    pub fn record_tool_call(&mut self) {
        self.last_tool_call = Instant::now();
    }

    /// Record a tool failure for cyclic-repeat detection, dropping the
    /// oldest sample once the window is full.
    pub fn record_failure(&mut self, sample: FailureSample) {
        self.failures.push_back(sample);
        while self.failures.len() > self.config.cyclic_window {
            self.failures.pop_front();
        }
    }

    /// Check all three conditions, in the order they'd matter to an
    /// operator: budget first (cheapest, most actionable), then
    /// cyclic, then stall.
    #[must_use]
    pub fn check(&self, budget: &BudgetTracker) -> Option<WatchdogFlag> {
        if budget.check_budget(0.0).is_exceeded() {
            return Some(WatchdogFlag::BudgetExceeded);
        }
        if let Some(flag) = self.check_cyclic() {
            return Some(flag);
        }
        if self.last_tool_call.elapsed() >= self.config.stall_timeout {
            return Some(WatchdogFlag::Stall);
        }
        None
    }

    fn check_cyclic(&self) -> Option<WatchdogFlag> {
        for candidate in &self.failures {
            let count = self
                .failures
                .iter()
                .filter(|s| s.feature_id == candidate.feature_id && s.error_hash == candidate.error_hash)
                .count();
            if count as u32 >= self.config.cyclic_threshold {
                return Some(WatchdogFlag::Cyclic {
                    feature_id: candidate.feature_id,
                    error_hash: candidate.error_hash,
                    count: count as u32,
                });
            }
        }
        None
    }
}

/// Hash error text with a fixed, process-stable hasher so repeated
/// occurrences of the same message always hash equal.
#[must_use]
pub fn hash_error_text(text: &str) -> u64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}
