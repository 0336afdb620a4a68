//! Escalation Rules (§4.10): evaluated after each `TOOL_RESULT` (and at
//! decision points) to decide whether to open an Injection Point
//! proactively, independent of the Hook Pipeline's own approval gate.
//!
//! The four built-in rules are structurally evaluated against
//! [`EscalationSignals`]; a custom rule (any id other than a built-in
//! one) is persisted and listed for audit, but its `condition` string
//! is free text, not an expression this evaluator runs — there is no
//! expression language here to interpret it against. Built-ins remain
//! customizable through their other fields (severity, message,
//! timeout, auto-pause) even though their trigger logic is fixed.

use arcadia_storage::models::{EscalationRule, InjectionType};

/// Id of the low-confidence built-in rule.
pub const LOW_CONFIDENCE: &str = "builtin:low_confidence";
/// Id of the feature-regression built-in rule.
pub const FEATURE_REGRESSION: &str = "builtin:feature_regression";
/// Id of the repeated-failure built-in rule.
pub const REPEATED_FAILURE: &str = "builtin:repeated_failure";
/// Id of the irreversible-action built-in rule.
pub const IRREVERSIBLE_ACTION: &str = "builtin:irreversible_action";

/// The consecutive-failure count at which [`REPEATED_FAILURE`] fires.
const REPEATED_FAILURE_THRESHOLD: u32 = 3;
/// The confidence below which [`LOW_CONFIDENCE`] fires.
const LOW_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// The four built-in rules, seeded via `EscalationRuleStore::put` once
/// at startup (idempotent — `put` replaces by id).
#[must_use]
pub fn builtin_rules() -> Vec<EscalationRule> {
    vec![
        EscalationRule {
            id: LOW_CONFIDENCE.into(),
            condition: "confidence < 0.5".into(),
            severity: 2,
            injection_type: InjectionType::Guidance,
            message_template: "low confidence ({confidence}) completing {tool}".into(),
            suggested_actions: vec!["proceed anyway".into(), "provide guidance".into()],
            auto_pause: false,
            timeout_s: 600,
        },
        EscalationRule {
            id: FEATURE_REGRESSION.into(),
            condition: "feature passing -> failing".into(),
            severity: 4,
            injection_type: InjectionType::Review,
            message_template: "feature {feature} regressed from passing to failing".into(),
            suggested_actions: vec!["roll back".into(), "continue investigating".into()],
            auto_pause: true,
            timeout_s: 900,
        },
        EscalationRule {
            id: REPEATED_FAILURE.into(),
            condition: "consecutive failures on the same feature >= 3".into(),
            severity: 3,
            injection_type: InjectionType::Redirect,
            message_template: "{consecutive_failures} consecutive failures on {feature}".into(),
            suggested_actions: vec!["change approach".into(), "skip feature".into()],
            auto_pause: false,
            timeout_s: 900,
        },
        EscalationRule {
            id: IRREVERSIBLE_ACTION.into(),
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

/// The signals one evaluation pass checks against the rule table.
#[derive(Debug, Clone, Default)]
pub struct EscalationSignals {
    /// The tool whose result is being evaluated.
    pub tool_name: String,
    /// The feature this result concerns, if any.
    pub feature_index: Option<i64>,
    /// The agent's stated confidence in the result, if it reported one.
    pub confidence: Option<f64>,
    /// Whether this result flipped `feature_index` from passing to
    /// failing.
    pub feature_regressed: bool,
    /// Consecutive failures on `feature_index` including this one.
    pub consecutive_failures: u32,
    /// Whether the action this result concerns was irreversible.
    pub irreversible: bool,
    /// Why it was irreversible, for the rendered message.
    pub irreversible_reason: Option<String>,
}

/// One rule's match against a set of signals, with its message rendered.
#[derive(Debug, Clone)]
pub struct Escalation {
    /// The id of the rule that matched.
    pub rule_id: String,
    /// The matched rule's severity.
    pub severity: u8,
    /// The kind of Injection Point this escalation should open.
    pub injection_type: InjectionType,
    /// The rendered message to show the human.
    pub message: String,
    /// Options offered alongside the default accept/deny pair.
    pub suggested_actions: Vec<String>,
    /// Whether this escalation should also pause the session.
    pub auto_pause: bool,
    /// Seconds to wait before applying the Injection Point's default.
    pub timeout_s: u32,
}

/// Evaluate every built-in rule present in `table` against `signals`,
/// most severe match first.
#[must_use]
pub fn evaluate(table: &[EscalationRule], signals: &EscalationSignals) -> Vec<Escalation> {
    let mut hits = Vec::new();
    for rule in table {
        let message = match rule.id.as_str() {
            LOW_CONFIDENCE => {
                let Some(confidence) = signals.confidence else { continue };
                if confidence >= LOW_CONFIDENCE_THRESHOLD {
                    continue;
                }
                render(&rule.message_template, &[
                    ("tool", signals.tool_name.as_str()),
                    ("confidence", &format!("{confidence:.2}")),
                ])
            },
            FEATURE_REGRESSION => {
                if !signals.feature_regressed {
                    continue;
                }
                render(&rule.message_template, &[("feature", &feature_label(signals.feature_index))])
            },
            REPEATED_FAILURE => {
                if signals.consecutive_failures < REPEATED_FAILURE_THRESHOLD {
                    continue;
                }
                render(&rule.message_template, &[
                    ("consecutive_failures", &signals.consecutive_failures.to_string()),
                    ("feature", &feature_label(signals.feature_index)),
                ])
            },
            IRREVERSIBLE_ACTION => {
                if !signals.irreversible {
                    continue;
                }
                render(&rule.message_template, &[
                    ("tool", signals.tool_name.as_str()),
                    ("reason", signals.irreversible_reason.as_deref().unwrap_or("unspecified")),
                ])
            },
            _ => continue,
        };
        hits.push(Escalation {
            rule_id: rule.id.clone(),
            severity: rule.severity,
            injection_type: rule.injection_type,
            message,
            suggested_actions: rule.suggested_actions.clone(),
            auto_pause: rule.auto_pause,
            timeout_s: rule.timeout_s,
        });
    }
    hits.sort_by(|a, b| b.severity.cmp(&a.severity));
    hits
}

fn feature_label(feature_index: Option<i64>) -> String {
    feature_index.map_or_else(|| "(no feature)".to_string(), |i| format!("#{i}"))
}

fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, val) in vars {
        out = out.replace(&format!("{{{key}}}"), val);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_confidence_fires_below_threshold_only() {
        let table = builtin_rules();
        let below = EscalationSignals { tool_name: "write_file".into(), confidence: Some(0.2), ..Default::default() };
        let at = EscalationSignals { tool_name: "write_file".into(), confidence: Some(0.5), ..Default::default() };

        assert_eq!(evaluate(&table, &below).len(), 1);
        assert!(evaluate(&table, &at).is_empty());
    }

    #[test]
    fn repeated_failure_requires_three() {
        let table = builtin_rules();
        let two = EscalationSignals { consecutive_failures: 2, ..Default::default() };
        let three = EscalationSignals { consecutive_failures: 3, ..Default::default() };

        assert!(evaluate(&table, &two).is_empty());
        assert_eq!(evaluate(&table, &three).len(), 1);
    }

    #[test]
    fn multiple_matches_sort_most_severe_first() {
        let table = builtin_rules();
        let signals = EscalationSignals {
            tool_name: "rm".into(),
            confidence: Some(0.1),
            irreversible: true,
            irreversible_reason: Some("deletes source files".into()),
            ..Default::default()
        };
        let hits = evaluate(&table, &signals);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].rule_id, IRREVERSIBLE_ACTION);
        assert_eq!(hits[1].rule_id, LOW_CONFIDENCE);
    }

    #[test]
    fn custom_rule_id_is_never_structurally_triggered() {
        let mut table = builtin_rules();
        table.push(EscalationRule {
            id: "custom:whatever".into(),
            condition: "anything".into(),
            severity: 5,
            injection_type: InjectionType::Decision,
            message_template: "{tool}".into(),
            suggested_actions: vec![],
            auto_pause: false,
            timeout_s: 60,
        });
        let signals = EscalationSignals::default();
        assert!(evaluate(&table, &signals).is_empty());
    }
}
