//! The gate decision and the rolling-window promote/demote logic.

use crate::error::{AutonomyError, AutonomyResult};
use crate::level::{required_level, LevelOverrides};
use arcadia_risk::{RiskAssessment, ToolInvocation};
use arcadia_storage::models::AutonomyLevel;
use arcadia_storage::models::AutonomyMetrics;
use serde::{Deserialize, Serialize};

/// Tunables for the rolling-window promote/demote rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutonomyConfig {
    /// Consecutive gated successes at the current level before promoting
    /// one level. Default 10.
    pub promote_after_successes: u32,
    /// Consecutive gated errors at the current level before demoting one
    /// level. Default 3.
    pub demote_after_errors: u32,
    /// The level demotion never drops below.
    pub floor: AutonomyLevel,
    /// The level promotion never rises above.
    pub ceiling: AutonomyLevel,
}

impl AutonomyConfig {
    /// Reject a configuration with zero thresholds or an inverted
    /// floor/ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`AutonomyError::InvalidConfig`] if either threshold is
    /// zero or `floor > ceiling`.
    pub fn validate(&self) -> AutonomyResult<()> {
        if self.promote_after_successes == 0 {
            return Err(AutonomyError::InvalidConfig {
                reason: "promote_after_successes must be at least 1".into(),
            });
        }
        if self.demote_after_errors == 0 {
            return Err(AutonomyError::InvalidConfig {
                reason: "demote_after_errors must be at least 1".into(),
            });
        }
        if self.floor > self.ceiling {
            return Err(AutonomyError::InvalidConfig {
                reason: "floor must not exceed ceiling".into(),
            });
        }
        Ok(())
    }
}

impl Default for AutonomyConfig {
    fn default() -> Self {
        Self {
            promote_after_successes: 10,
            demote_after_errors: 3,
            floor: AutonomyLevel::Observe,
            ceiling: AutonomyLevel::FullAuto,
        }
    }
}

/// The outcome of a gated invocation, fed back into the rolling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The invocation completed without error.
    Success,
    /// The invocation errored.
    Error,
}

/// `{allow, effective_level, required_level, requires_approval,
/// requires_checkpoint, reason, alternatives}` (§4.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateResult {
    /// Whether the session's current level meets the requirement.
    pub allow: bool,
    /// The session's level at decision time.
    pub effective_level: AutonomyLevel,
    /// The level the invocation required.
    pub required_level: AutonomyLevel,
    /// Whether a human must approve before the invocation proceeds.
    pub requires_approval: bool,
    /// Whether a checkpoint must be taken before the invocation runs.
    pub requires_checkpoint: bool,
    /// Human-readable explanation of the decision.
    pub reason: String,
    /// Suggested alternatives when the gate denies the invocation.
    pub alternatives: Vec<String>,
}

/// Stateless evaluator over a session's persisted [`AutonomyMetrics`].
///
/// The gate never holds session state itself — the caller fetches
/// [`AutonomyMetrics`] from the store, calls [`AutonomyGate::evaluate`]
/// and, once the invocation has run, [`AutonomyGate::record_outcome`],
/// then persists the returned metrics and logs the decision. This keeps
/// leveling state durable across a crash the way the rest of the
/// session's record is.
#[derive(Debug, Clone, Default)]
pub struct AutonomyGate {
    config: AutonomyConfig,
    overrides: LevelOverrides,
}

impl AutonomyGate {
    /// Build a gate with the given promote/demote thresholds.
    #[must_use]
    pub fn new(config: AutonomyConfig) -> Self {
        Self { config, overrides: LevelOverrides::new() }
    }

    /// Attach per-tool level overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: LevelOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// The configured thresholds.
    #[must_use]
    pub fn config(&self) -> &AutonomyConfig {
        &self.config
    }

    /// Decide whether `invocation` may proceed given the session's
    /// current metrics and the invocation's risk assessment.
    #[must_use]
    pub fn evaluate(
        &self,
        metrics: &AutonomyMetrics,
        tool_name: &str,
        invocation: &ToolInvocation,
        assessment: &RiskAssessment,
    ) -> GateResult {
        let required = required_level(tool_name, invocation, assessment, &self.overrides);
        let effective = metrics.current_level;
        let allow = effective >= required;
        let forced_by_risk = assessment.risk_level >= 4 && !assessment.reversible;

        let requires_checkpoint = assessment.requires_checkpoint || forced_by_risk;
        let requires_approval = assessment.requires_approval || forced_by_risk || !allow;

        let reason = if allow {
            format!(
                "{tool_name}: session at {effective:?} meets the {required:?} requirement"
            )
        } else {
            format!(
                "{tool_name}: session at {effective:?} is below the required {required:?} level"
            )
        };

        let alternatives = if allow {
            Vec::new()
        } else {
            vec![
                "request human approval to proceed at the current level".to_string(),
                format!(
                    "continue accumulating successes to promote toward {required:?}"
                ),
            ]
        };

        GateResult {
            allow,
            effective_level: effective,
            required_level: required,
            requires_approval,
            requires_checkpoint,
            reason,
            alternatives,
        }
    }

    /// Apply a gated invocation's outcome to the rolling window,
    /// returning the (possibly promoted/demoted) metrics to persist.
    #[must_use]
    pub fn record_outcome(&self, metrics: &AutonomyMetrics, outcome: Outcome) -> AutonomyMetrics {
        let mut next = metrics.clone();
        match outcome {
            Outcome::Success => {
                next.consecutive_errors = 0;
                next.consecutive_successes += 1;
                if next.consecutive_successes >= self.config.promote_after_successes {
                    if let Some(promoted) = step(next.current_level, 1, self.config.ceiling) {
                        next.current_level = promoted;
                    }
                    next.consecutive_successes = 0;
                }
            }
            Outcome::Error => {
                next.consecutive_successes = 0;
                next.consecutive_errors += 1;
                if next.consecutive_errors >= self.config.demote_after_errors {
                    if let Some(demoted) = step(next.current_level, -1, self.config.floor) {
                        next.current_level = demoted;
                    }
                    next.consecutive_errors = 0;
                }
            }
        }
        next
    }
}

/// Move `level` by `delta` (+1 or -1), clamped to `bound` (ceiling for
/// +1, floor for -1). Returns `None` if `level` is already at `bound`.
fn step(level: AutonomyLevel, delta: i8, bound: AutonomyLevel) -> Option<AutonomyLevel> {
    if (delta > 0 && level >= bound) || (delta < 0 && level <= bound) {
        return None;
    }
    let next = (level as i8) + delta;
    level_from_i8(next)
}

fn level_from_i8(value: i8) -> Option<AutonomyLevel> {
    match value {
        1 => Some(AutonomyLevel::Observe),
        2 => Some(AutonomyLevel::Plan),
        3 => Some(AutonomyLevel::ExecuteSafe),
        4 => Some(AutonomyLevel::ExecuteReview),
        5 => Some(AutonomyLevel::FullAuto),
        _ => None,
    }
}
