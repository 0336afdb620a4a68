//! Configuration struct definitions.
//!
//! [`Config`] is a single `#[serde(default)]` tree covering every
//! tunable named throughout the system: the Security Gate's policy,
//! the Autonomy Manager's promote/demote thresholds, the session
//! budget cap and token rates, the Watchdog's stall/cyclic-failure
//! windows, Warm Memory's retention depth, the Escalation Rule table,
//! logging, and session-resume behavior. Component crates that already
//! own a serializable config type (`arcadia-security`, `arcadia-autonomy`,
//! `arcadia-budget`) are reused directly instead of duplicated here;
//! types that live in the supervisor and aren't themselves
//! serializable (`WatchdogConfig`'s `Duration`) get a small
//! `#[serde(default)]` section here that converts on demand.

use arcadia_autonomy::AutonomyConfig;
use arcadia_budget::BudgetConfig;
use arcadia_security::SecurityPolicy;
use arcadia_storage::models::{EscalationRule, InjectionType};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};

/// The full, resolved configuration tree for one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The Security Gate's hard boundaries.
    pub security: SecurityPolicy,
    /// Promote/demote thresholds for the Autonomy Manager.
    pub autonomy: AutonomyConfig,
    /// Session dollar cap and token pricing.
    pub budget: BudgetConfig,
    /// Stall timeout and cyclic-failure window for the session watchdog.
    pub watchdog: WatchdogSection,
    /// Warm Memory retention depth.
    pub memory: MemorySection,
    /// The Escalation Rule table.
    pub escalation: EscalationSection,
    /// Logging format and destination.
    pub logging: LoggingSection,
    /// Session lifecycle tunables (resume behavior, etc).
    pub sessions: SessionsSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            security: SecurityPolicy::default(),
            autonomy: AutonomyConfig::default(),
            budget: BudgetConfig::default(),
            watchdog: WatchdogSection::default(),
            memory: MemorySection::default(),
            escalation: EscalationSection::default(),
            logging: LoggingSection::default(),
            sessions: SessionsSection::default(),
        }
    }
}

impl Config {
    /// Validate every section, surfacing the first rejection.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any section rejects its
    /// own values (e.g. a non-positive budget cap, or an autonomy
    /// floor above its ceiling).
    pub fn validate(&self) -> ConfigResult<()> {
        self.security.validate().map_err(|e| ConfigError::Validation(e.to_string()))?;
        self.autonomy.validate().map_err(|e| ConfigError::Validation(e.to_string()))?;
        self.budget.validate().map_err(|e| ConfigError::Validation(e.to_string()))?;
        self.watchdog.validate()?;
        Ok(())
    }
}

/// Stall and cyclic-failure tunables for the session watchdog.
///
/// `arcadia-supervisor::WatchdogConfig` isn't itself serializable
/// (`Duration` has no `serde` impl without an adapter crate); this
/// section mirrors its fields with a plain seconds count and converts
/// on demand via [`WatchdogSection::stall_timeout`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchdogSection {
    /// How long `RUN` may go without a `TOOL_CALL` before it's stalled.
    pub stall_timeout_secs: u64,
    /// Repeats of the same `(feature, error)` pair that count as cyclic.
    pub cyclic_threshold: u32,
    /// How many recent failures are considered when looking for a repeat.
    pub cyclic_window: usize,
}

impl WatchdogSection {
    /// The configured stall timeout as a [`Duration`].
    #[must_use]
    pub fn stall_timeout(&self) -> Duration {
        Duration::from_secs(self.stall_timeout_secs)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.stall_timeout_secs == 0 {
            return Err(ConfigError::Validation("watchdog.stall_timeout_secs must be at least 1".into()));
        }
        if self.cyclic_threshold == 0 {
            return Err(ConfigError::Validation("watchdog.cyclic_threshold must be at least 1".into()));
        }
        if self.cyclic_window == 0 {
            return Err(ConfigError::Validation("watchdog.cyclic_window must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for WatchdogSection {
    /// 10 minute stall timeout, 3 repeats within the last 10 failures —
    /// matches `arcadia-supervisor::WatchdogConfig::default()`.
    fn default() -> Self {
        Self { stall_timeout_secs: 600, cyclic_threshold: 3, cyclic_window: 10 }
    }
}

/// Warm Memory retention.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySection {
    /// Most recent Warm Memory summaries kept before the oldest decays
    /// to Cold.
    pub warm_retention: usize,
}

impl Default for MemorySection {
    fn default() -> Self {
        Self { warm_retention: 5 }
    }
}

/// The Escalation Rule table: the four built-ins plus any project-defined
/// custom rules appended from `.arcadia/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationSection {
    /// Full rule table, built-ins first.
    pub rules: Vec<EscalationRule>,
}

impl Default for EscalationSection {
    fn default() -> Self {
        Self { rules: builtin_escalation_rules() }
    }
}

/// The four built-in Escalation Rules, seeded into
/// `EscalationRuleStore` at project startup. Kept here rather than
/// imported from the Human Channel crate so that loading configuration
/// doesn't pull in the approval-gateway stack it isn't needed for.
#[must_use]
pub fn builtin_escalation_rules() -> Vec<EscalationRule> {
    vec![
        EscalationRule {
            id: "builtin:low_confidence".into(),
            condition: "confidence < 0.5".into(),
            severity: 2,
            injection_type: InjectionType::Guidance,
            message_template: "low confidence ({confidence}) completing {tool}".into(),
            suggested_actions: vec!["proceed anyway".into(), "provide guidance".into()],
            auto_pause: false,
            timeout_s: 600,
        },
        EscalationRule {
            id: "builtin:feature_regression".into(),
            condition: "feature passing -> failing".into(),
            severity: 4,
            injection_type: InjectionType::Review,
            message_template: "feature {feature} regressed from passing to failing".into(),
            suggested_actions: vec!["roll back".into(), "continue investigating".into()],
            auto_pause: true,
            timeout_s: 900,
        },
        EscalationRule {
            id: "builtin:repeated_failure".into(),
            condition: "consecutive failures on the same feature >= 3".into(),
            severity: 3,
            injection_type: InjectionType::Redirect,
            message_template: "{consecutive_failures} consecutive failures on {feature}".into(),
            suggested_actions: vec!["change approach".into(), "skip feature".into()],
            auto_pause: false,
            timeout_s: 900,
        },
        EscalationRule {
            id: "builtin:irreversible_action".into(),
            condition: "action is irreversible".into(),
            severity: 5,
            injection_type: InjectionType::Approval,
            message_template: "{tool} is irreversible: {reason}".into(),
            suggested_actions: vec!["approve".into(), "deny".into()],
            auto_pause: false,
            timeout_s: 300,
        },
    ]
}

/// Logging format and destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Base `tracing` level (`"trace"`, `"debug"`, `"info"`, `"warn"`, `"error"`).
    pub level: String,
    /// Output format: `"compact"`, `"pretty"`, or `"json"`.
    pub format: String,
    /// Per-crate directive overrides, e.g. `"arcadia_hooks=debug"`.
    pub directives: Vec<String>,
    /// Directory to roll daily log files into. `None` logs to stderr.
    pub directory: Option<std::path::PathBuf>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self { level: "info".into(), format: "compact".into(), directives: Vec::new(), directory: None }
    }
}

/// Session lifecycle tunables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionsSection {
    /// Resume from the last checkpoint on startup if a paused session
    /// marker is present, rather than requiring an explicit `--resume`.
    pub auto_resume: bool,
}

impl Default for SessionsSection {
    fn default() -> Self {
        Self { auto_resume: false }
    }
}
