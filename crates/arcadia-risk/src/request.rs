//! Risk assessment and classification (§4.4).
//!
//! [`RiskAssessment`] is the Risk Classifier's output: enough for the
//! Autonomy Manager to decide whether a tool invocation needs a human,
//! and enough for the Checkpoint Manager to decide whether it needs a
//! snapshot first. [`RiskClassifier`] produces one from a pattern table
//! plus a per-kind default.

use serde::{Deserialize, Serialize};
use std::fmt;

use arcadia_storage::models::RiskPattern;

use crate::action::ToolInvocation;
use crate::error::{RiskError, RiskResult};

/// The Risk Classifier's assessment of a tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Risk level, 1 (lowest) through 5 (highest).
    pub risk_level: u8,
    /// Whether the action can be undone.
    pub reversible: bool,
    /// Whether the action mutates the project's source of truth (the
    /// Feature Registry, VCS, deployed infra).
    pub affects_source_of_truth: bool,
    /// Whether the action has side effects outside the project sandbox
    /// (network write, process spawn, VCS push).
    pub external_side_effects: bool,
    /// Whether this invocation must pass through a human before it runs.
    pub requires_approval: bool,
    /// Whether this invocation must be preceded by a checkpoint.
    pub requires_checkpoint: bool,
    /// Whether this invocation should be flagged for post-hoc review.
    pub requires_review: bool,
    /// A suggested safer alternative, shown to the human if escalated.
    pub mitigation: Option<String>,
}

impl RiskAssessment {
    /// The least risky possible assessment: read-only, reversible, no
    /// side effects, no gates.
    #[must_use]
    pub fn benign() -> Self {
        Self {
            risk_level: 1,
            reversible: true,
            affects_source_of_truth: false,
            external_side_effects: false,
            requires_approval: false,
            requires_checkpoint: false,
            requires_review: false,
            mitigation: None,
        }
    }
}

impl fmt::Display for RiskAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "risk={} reversible={} approval={} checkpoint={}",
            self.risk_level, self.reversible, self.requires_approval, self.requires_checkpoint
        )
    }
}

/// Classifies tool invocations into [`RiskAssessment`]s.
///
/// Checks the configured pattern table first (first match wins, in
/// table order), then falls back to a default per [`ToolInvocation`]
/// kind.
#[derive(Debug, Default, Clone)]
pub struct RiskClassifier;

impl RiskClassifier {
    /// Create a classifier. Stateless — all configuration is passed to
    /// [`Self::classify`] as the pattern table.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Classify an invocation against a pattern table, falling back to
    /// the built-in default for its kind.
    #[must_use]
    pub fn classify(&self, invocation: &ToolInvocation, patterns: &[RiskPattern]) -> RiskAssessment {
        let rendered = invocation.rendered();
        for pattern in patterns {
            if matches_pattern(&pattern.pattern, &rendered) {
                return RiskAssessment {
                    risk_level: pattern.risk_level,
                    reversible: pattern.reversible,
                    affects_source_of_truth: pattern.affects_source_of_truth,
                    external_side_effects: pattern.external_side_effects,
                    requires_approval: pattern.requires_approval,
                    requires_checkpoint: pattern.requires_checkpoint,
                    requires_review: pattern.requires_review,
                    mitigation: pattern.mitigation.clone(),
                };
            }
        }
        default_assessment(invocation)
    }

    /// Verify every configured pattern compiles as a glob, surfacing the
    /// first failure. Call this once after loading patterns from
    /// configuration or storage.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::InvalidPattern`] if a pattern isn't a valid
    /// glob.
    pub fn validate_patterns(&self, patterns: &[RiskPattern]) -> RiskResult<()> {
        for pattern in patterns {
            globset::Glob::new(&pattern.pattern).map_err(|e| RiskError::InvalidPattern {
                pattern: pattern.pattern.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}

/// Match a configured pattern (a glob, or else a plain prefix) against
/// an invocation's rendered form.
fn matches_pattern(pattern: &str, rendered: &str) -> bool {
    globset::Glob::new(pattern)
        .ok()
        .map(|g| g.compile_matcher().is_match(rendered))
        .unwrap_or_else(|| rendered.starts_with(pattern))
}

/// The built-in default assessment for an invocation kind, used when no
/// configured pattern matches.
fn default_assessment(invocation: &ToolInvocation) -> RiskAssessment {
    match invocation {
        ToolInvocation::FileRead { .. } => RiskAssessment::benign(),

        ToolInvocation::FileWrite { .. } => RiskAssessment {
            risk_level: 2,
            reversible: true,
            affects_source_of_truth: false,
            external_side_effects: false,
            requires_approval: false,
            requires_checkpoint: false,
            requires_review: false,
            mitigation: None,
        },

        ToolInvocation::FileDelete { .. } => RiskAssessment {
            risk_level: 3,
            reversible: false,
            affects_source_of_truth: false,
            external_side_effects: false,
            requires_approval: true,
            requires_checkpoint: false,
            requires_review: false,
            mitigation: Some("move to a backup location instead of deleting".to_string()),
        },

        ToolInvocation::ExecuteCommand { .. } => RiskAssessment {
            risk_level: 3,
            reversible: false,
            affects_source_of_truth: true,
            external_side_effects: true,
            requires_approval: false,
            requires_checkpoint: true,
            requires_review: false,
            mitigation: None,
        },

        ToolInvocation::NetworkRequest { .. } => RiskAssessment {
            risk_level: 2,
            reversible: true,
            affects_source_of_truth: false,
            external_side_effects: true,
            requires_approval: false,
            requires_checkpoint: false,
            requires_review: false,
            mitigation: None,
        },

        ToolInvocation::TransmitData { .. } => RiskAssessment {
            risk_level: 4,
            reversible: false,
            affects_source_of_truth: false,
            external_side_effects: true,
            requires_approval: true,
            requires_checkpoint: false,
            requires_review: true,
            mitigation: None,
        },

        ToolInvocation::Named { .. } => RiskAssessment {
            risk_level: 2,
            reversible: true,
            affects_source_of_truth: false,
            external_side_effects: false,
            requires_approval: false,
            requires_checkpoint: false,
            requires_review: false,
            mitigation: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_read_defaults_to_benign() {
        let invocation = ToolInvocation::FileRead {
            path: "/tmp/f".to_string(),
        };
        let classifier = RiskClassifier::new();
        let assessment = classifier.classify(&invocation, &[]);
        assert_eq!(assessment, RiskAssessment::benign());
    }

    #[test]
    fn execute_command_requires_checkpoint_by_default() {
        let invocation = ToolInvocation::ExecuteCommand {
            command: "git".to_string(),
            args: vec!["commit".to_string()],
        };
        let classifier = RiskClassifier::new();
        let assessment = classifier.classify(&invocation, &[]);
        assert!(assessment.requires_checkpoint);
        assert!(assessment.affects_source_of_truth);
    }

    #[test]
    fn configured_pattern_overrides_default() {
        let invocation = ToolInvocation::ExecuteCommand {
            command: "curl".to_string(),
            args: vec!["https://example.com".to_string()],
        };
        let patterns = vec![RiskPattern {
            id: "p1".to_string(),
            pattern: "curl*".to_string(),
            risk_level: 5,
            reversible: false,
            affects_source_of_truth: false,
            external_side_effects: true,
            requires_approval: true,
            requires_checkpoint: false,
            requires_review: true,
            mitigation: Some("use the built-in fetch tool instead".to_string()),
        }];
        let classifier = RiskClassifier::new();
        let assessment = classifier.classify(&invocation, &patterns);
        assert_eq!(assessment.risk_level, 5);
        assert!(assessment.requires_approval);
        assert!(assessment.requires_review);
    }

    #[test]
    fn pattern_falls_back_to_prefix_match_on_invalid_glob() {
        let invocation = ToolInvocation::ExecuteCommand {
            command: "rm".to_string(),
            args: vec!["-rf".to_string(), "/tmp".to_string()],
        };
        let patterns = vec![RiskPattern {
            id: "p1".to_string(),
            pattern: "rm -rf".to_string(),
            risk_level: 5,
            reversible: false,
            affects_source_of_truth: true,
            external_side_effects: false,
            requires_approval: true,
            requires_checkpoint: true,
            requires_review: true,
            mitigation: None,
        }];
        let classifier = RiskClassifier::new();
        let assessment = classifier.classify(&invocation, &patterns);
        assert_eq!(assessment.risk_level, 5);
    }

    #[test]
    fn validate_patterns_rejects_bad_glob() {
        let patterns = vec![RiskPattern {
            id: "p1".to_string(),
            pattern: "[".to_string(),
            risk_level: 1,
            reversible: true,
            affects_source_of_truth: false,
            external_side_effects: false,
            requires_approval: false,
            requires_checkpoint: false,
            requires_review: false,
            mitigation: None,
        }];
        let classifier = RiskClassifier::new();
        assert!(classifier.validate_patterns(&patterns).is_err());
    }
}
