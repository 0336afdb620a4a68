//! Budget tracking for a session's USD spend (§4.13).
//!
//! Token counts come off `TOOL_CALL`/`TOOL_RESULT` payloads; the
//! [`TokenRates`] table turns them into a running dollar cost, which the
//! [`BudgetTracker`] checks against a session cap. Exceeding the cap
//! doesn't abort mid-tool — the supervisor checks `is_allowed()` at the
//! next safe point between tool calls.

use arcadia_core::TokenUsage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::RwLock;

use crate::error::{BudgetError, BudgetOpResult};

/// Per-1000-token input/output pricing used to convert token usage into
/// a dollar cost.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TokenRates {
    /// USD per 1000 input tokens.
    pub input_per_1k_usd: f64,
    /// USD per 1000 output tokens.
    pub output_per_1k_usd: f64,
}

impl TokenRates {
    /// Create a new rate table.
    #[must_use]
    pub fn new(input_per_1k_usd: f64, output_per_1k_usd: f64) -> Self {
        Self {
            input_per_1k_usd,
            output_per_1k_usd,
        }
    }

    /// Dollar cost of a turn's token usage.
    #[must_use]
    pub fn cost(&self, usage: &TokenUsage) -> f64 {
        (usage.input_tokens as f64 / 1000.0) * self.input_per_1k_usd
            + (usage.output_tokens as f64 / 1000.0) * self.output_per_1k_usd
    }
}

impl Default for TokenRates {
    /// $0.003 per 1k input tokens, $0.015 per 1k output tokens.
    fn default() -> Self {
        Self::new(0.003, 0.015)
    }
}

/// Configuration for a session's budget cap.
///
/// # Example
///
/// ```
/// use arcadia_budget::BudgetConfig;
///
/// let config = BudgetConfig::new(1.0);
/// assert!((config.session_max_usd - 1.0).abs() < f64::EPSILON);
/// assert_eq!(config.warn_at_percent, 80);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetConfig {
    /// Maximum total spend for the session (USD).
    pub session_max_usd: f64,
    /// Warning threshold as a percentage of the session budget (0-100).
    pub warn_at_percent: u8,
    /// Token pricing used to convert usage into cost.
    pub rates: TokenRates,
}

impl BudgetConfig {
    /// Create a new budget config with the default token rates and an
    /// 80% warning threshold.
    #[must_use]
    pub fn new(session_max_usd: f64) -> Self {
        Self {
            session_max_usd,
            warn_at_percent: 80,
            rates: TokenRates::default(),
        }
    }

    /// Set the warning threshold percentage.
    #[must_use]
    pub fn with_warn_at_percent(mut self, percent: u8) -> Self {
        self.warn_at_percent = percent.min(100);
        self
    }

    /// Use a custom token rate table instead of the default.
    #[must_use]
    pub fn with_rates(mut self, rates: TokenRates) -> Self {
        self.rates = rates;
        self
    }

    /// The warning threshold as a dollar amount.
    #[must_use]
    pub fn warn_threshold_usd(&self) -> f64 {
        self.session_max_usd * f64::from(self.warn_at_percent) / 100.0
    }

    /// Reject a non-positive or non-finite session cap before it's
    /// handed to a tracker.
    ///
    /// # Errors
    ///
    /// Returns [`BudgetError::InvalidConfig`] if `session_max_usd` isn't
    /// a positive, finite number.
    pub fn validate(&self) -> BudgetOpResult<()> {
        if !self.session_max_usd.is_finite() || self.session_max_usd <= 0.0 {
            return Err(BudgetError::InvalidConfig {
                reason: format!("session_max_usd must be positive and finite, got {}", self.session_max_usd),
            });
        }
        Ok(())
    }
}

impl Default for BudgetConfig {
    /// A $1.00 session cap, the seed-scenario default.
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Result of a budget check.
#[derive(Debug, Clone, PartialEq)]
pub enum BudgetResult {
    /// Within budget — proceed without warning.
    Allowed,
    /// At or above the warning threshold — the supervisor should open an
    /// injection point before continuing.
    WarnAndAllow {
        /// Current session spend (USD).
        current_spend: f64,
        /// Session budget (USD).
        session_max: f64,
        /// Percentage of budget used.
        percent_used: f64,
    },
    /// Over budget — the session must stop at the next safe point.
    Exceeded {
        /// How much was requested (USD).
        requested: f64,
        /// How much was available (USD).
        available: f64,
    },
}

impl BudgetResult {
    /// Whether this result allows continuing (possibly with a warning).
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed | Self::WarnAndAllow { .. })
    }

    /// Whether this result means the budget was exceeded.
    #[must_use]
    pub fn is_exceeded(&self) -> bool {
        matches!(self, Self::Exceeded { .. })
    }
}

impl fmt::Display for BudgetResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allowed => write!(f, "within budget"),
            Self::WarnAndAllow { percent_used, .. } => {
                write!(f, "budget warning: {percent_used:.0}% used")
            },
            Self::Exceeded {
                requested,
                available,
            } => write!(
                f,
                "budget exceeded: requested ${requested:.4}, available ${available:.4}"
            ),
        }
    }
}

/// Tracks spending against a session's USD cap. Thread-safe via an
/// internal `RwLock`, so the Hook Pipeline and the supervisor's watchdog
/// can both read and record against the same tracker.
pub struct BudgetTracker {
    config: BudgetConfig,
    session_spent: RwLock<f64>,
}

impl BudgetTracker {
    /// Create a new tracker with the given configuration.
    #[must_use]
    pub fn new(config: BudgetConfig) -> Self {
        Self {
            config,
            session_spent: RwLock::new(0.0),
        }
    }

    /// Record a turn's token usage and report whether the session is
    /// still within budget.
    pub fn record_usage(&self, usage: &TokenUsage) -> BudgetResult {
        let cost = self.config.rates.cost(usage);
        self.record_cost(cost);
        self.check_budget(0.0)
    }

    /// Check whether an additional cost would keep the session within
    /// budget, without recording it.
    #[must_use]
    pub fn check_budget(&self, additional_cost: f64) -> BudgetResult {
        let spent = self.session_spent.read().map(|s| *s).unwrap_or(0.0);
        let projected = spent + additional_cost;
        let remaining = self.config.session_max_usd - projected;

        if remaining < 0.0 {
            return BudgetResult::Exceeded {
                requested: projected,
                available: self.config.session_max_usd,
            };
        }

        let warn_threshold = self.config.warn_threshold_usd();
        if projected >= warn_threshold {
            return BudgetResult::WarnAndAllow {
                current_spend: projected,
                session_max: self.config.session_max_usd,
                percent_used: (projected / self.config.session_max_usd) * 100.0,
            };
        }

        BudgetResult::Allowed
    }

    /// Record an actual cost against the session's running total. Only
    /// positive, finite values are accepted.
    pub fn record_cost(&self, cost: f64) {
        if cost > 0.0
            && cost.is_finite()
            && let Ok(mut spent) = self.session_spent.write()
        {
            *spent += cost;
        }
    }

    /// Total spent so far this session.
    #[must_use]
    pub fn spent(&self) -> f64 {
        self.session_spent.read().map(|s| *s).unwrap_or(0.0)
    }

    /// Remaining budget, floored at zero.
    #[must_use]
    pub fn remaining(&self) -> f64 {
        (self.config.session_max_usd - self.spent()).max(0.0)
    }

    /// The tracker's configuration.
    #[must_use]
    pub fn config(&self) -> &BudgetConfig {
        &self.config
    }

    /// Take a snapshot for persistence (e.g. on pause).
    #[must_use]
    pub fn snapshot(&self) -> BudgetSnapshot {
        BudgetSnapshot {
            session_spent_usd: self.spent(),
            config: self.config.clone(),
        }
    }

    /// Restore a tracker from a previously saved snapshot. Negative,
    /// `NaN`, or infinite spend is clamped to zero so a tampered
    /// snapshot can't grant unlimited budget.
    #[must_use]
    pub fn restore(snapshot: BudgetSnapshot) -> Self {
        let spent = if snapshot.session_spent_usd.is_finite() {
            snapshot.session_spent_usd.max(0.0)
        } else {
            0.0
        };
        let tracker = Self::new(snapshot.config);
        if spent > 0.0
            && let Ok(mut s) = tracker.session_spent.write()
        {
            *s = spent;
        }
        tracker
    }
}

impl Default for BudgetTracker {
    fn default() -> Self {
        Self::new(BudgetConfig::default())
    }
}

impl fmt::Debug for BudgetTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BudgetTracker")
            .field("config", &self.config)
            .field("spent", &self.spent())
            .field("remaining", &self.remaining())
            .finish_non_exhaustive()
    }
}

/// Snapshot of a tracker's state, persisted across pause/resume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetSnapshot {
    /// Total spent so far (USD).
    pub session_spent_usd: f64,
    /// The budget configuration in effect.
    pub config: BudgetConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rates_match_seed_scenario() {
        let rates = TokenRates::default();
        let usage = TokenUsage {
            input_tokens: 1000,
            output_tokens: 1000,
        };
        assert!((rates.cost(&usage) - 0.018).abs() < 1e-9);
    }

    #[test]
    fn tracker_within_budget() {
        let tracker = BudgetTracker::new(BudgetConfig::new(1.0));
        assert_eq!(tracker.check_budget(0.1), BudgetResult::Allowed);
    }

    #[test]
    fn tracker_warns_at_threshold() {
        let tracker = BudgetTracker::new(BudgetConfig::new(1.0));
        tracker.record_cost(0.75);
        let result = tracker.check_budget(0.1);
        assert!(matches!(result, BudgetResult::WarnAndAllow { .. }));
        assert!(result.is_allowed());
    }

    #[test]
    fn tracker_exceeds_cap() {
        let tracker = BudgetTracker::new(BudgetConfig::new(1.0));
        tracker.record_cost(0.95);
        let result = tracker.check_budget(0.1);
        assert!(result.is_exceeded());
    }

    #[test]
    fn record_usage_accumulates_cost_from_tokens() {
        let tracker = BudgetTracker::new(BudgetConfig::new(1.0));
        let usage = TokenUsage {
            input_tokens: 10_000,
            output_tokens: 10_000,
        };
        // (10 * 0.003) + (10 * 0.015) = 0.18
        tracker.record_usage(&usage);
        assert!((tracker.spent() - 0.18).abs() < 1e-9);
    }

    #[test]
    fn record_cost_rejects_non_finite_and_negative() {
        let tracker = BudgetTracker::default();
        tracker.record_cost(-1.0);
        tracker.record_cost(f64::NAN);
        tracker.record_cost(f64::INFINITY);
        assert!(tracker.spent().abs() < f64::EPSILON);
    }

    #[test]
    fn snapshot_restore_round_trips() {
        let tracker = BudgetTracker::new(BudgetConfig::new(1.0));
        tracker.record_cost(0.42);
        let snapshot = tracker.snapshot();
        let restored = BudgetTracker::restore(snapshot);
        assert!((restored.spent() - 0.42).abs() < 1e-9);
    }

    #[test]
    fn restore_clamps_tampered_negative_spend() {
        let snapshot = BudgetSnapshot {
            session_spent_usd: -50.0,
            config: BudgetConfig::new(1.0),
        };
        let tracker = BudgetTracker::restore(snapshot);
        assert!(tracker.spent().abs() < f64::EPSILON);
    }

    #[test]
    fn validate_rejects_non_positive_cap() {
        assert!(BudgetConfig::new(0.0).validate().is_err());
        assert!(BudgetConfig::new(-1.0).validate().is_err());
        assert!(BudgetConfig::new(f64::NAN).validate().is_err());
        assert!(BudgetConfig::new(1.0).validate().is_ok());
    }

    #[test]
    fn remaining_never_negative() {
        let tracker = BudgetTracker::new(BudgetConfig::new(1.0));
        tracker.record_cost(5.0);
        assert!(tracker.remaining().abs() < f64::EPSILON);
    }
}
