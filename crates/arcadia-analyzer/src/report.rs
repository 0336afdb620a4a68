//! Assembling a [`FailureReport`] from a session's Event Log slice.

use crate::error::AnalyzerResult;
use crate::hint::FailureHint;
use arcadia_core::{EventType, FailureReportId, SessionId};
use arcadia_events::EventLog;
use arcadia_storage::models::{FailureCategory, FailureReport};
use arcadia_storage::{Database, FailureReportStore};

/// Per-category canned next steps, shown to the human (or the next
/// session's priming prompt) alongside the analyzer's specific
/// `likely_cause`.
fn suggested_fixes(category: FailureCategory) -> Vec<String> {
    match category {
        FailureCategory::CyclicError => vec![
            "inspect the repeating error text for a root cause the agent keeps missing".to_string(),
            "consider recording an Intervention once a fix is known, so future sessions learn it".to_string(),
        ],
        FailureCategory::BlockedCommands => vec![
            "the agent is retrying a command the Security Gate denies; check whether the gate's \
             policy needs a narrower allow rule or the agent needs a different approach"
                .to_string(),
        ],
        FailureCategory::Timeout => {
            vec!["raise the stall timeout or budget cap if the task is legitimately slow, \
                  otherwise look for a tool call that never returns"
                .to_string()]
        },
        FailureCategory::Crash => {
            vec!["check the process's stderr/exit status from before the crash".to_string()]
        },
        FailureCategory::Regression => {
            vec!["diff the feature's last passing checkpoint against the current tree".to_string()]
        },
        FailureCategory::Ok => Vec::new(),
    }
}

/// Scans a session's Event Log slice and files a [`FailureReport`].
///
/// Grounded on the range/session-scoped query-helper pattern
/// (`get_session_entries`, `get_entries_in_range`) from a signed audit
/// log's storage layer, adapted to scan plain [`arcadia_events::Event`]
/// records rather than a cryptographically chained log — there is no
/// chain-verification step here, only a linear scan for context.
pub struct FailureAnalyzer<'a> {
    events: &'a EventLog,
    db: &'a Database,
}

impl<'a> FailureAnalyzer<'a> {
    /// Build an analyzer over `events` and `db`.
    #[must_use]
    pub fn new(events: &'a EventLog, db: &'a Database) -> Self {
        Self { events, db }
    }

    /// Classify and file a [`FailureReport`] for `session_id`, given
    /// `hint`. Persists the report and returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if the Event Log cannot be read or the report
    /// cannot be persisted.
    pub async fn analyze(
        &self,
        session_id: SessionId,
        hint: &FailureHint,
    ) -> AnalyzerResult<FailureReport> {
        let category = hint.category();
        let events = self.events.reconstruct_session(session_id).await?;

        let last_successful_action = events
            .iter()
            .rev()
            .find(|e| e.event_type == EventType::ToolResult)
            .and_then(|e| tool_name(&e.payload));

        let failing_action = events
            .iter()
            .rev()
            .find(|e| matches!(e.event_type, EventType::ToolError | EventType::ToolBlocked))
            .and_then(|e| tool_name(&e.payload));

        let error_messages: Vec<String> = events
            .iter()
            .filter(|e| matches!(e.event_type, EventType::ToolError | EventType::ToolBlocked))
            .filter_map(|e| error_text(&e.payload))
            .collect();

        let similar_past_failures = FailureReportStore::new(self.db)
            .list_by_category(category)
            .await?
            .into_iter()
            .filter(|r| r.session_id != session_id)
            .map(|r| r.id)
            .take(5)
            .collect();

        let report = FailureReport {
            id: FailureReportId::new(session_id.get()),
            session_id,
            category,
            last_successful_action,
            failing_action,
            confidence: confidence_for(hint, &error_messages),
            likely_cause: likely_cause(hint, &error_messages),
            error_messages,
            similar_past_failures,
            suggested_fixes: suggested_fixes(category),
        };

        FailureReportStore::new(self.db).create(&report).await?;
        Ok(report)
    }
}

fn tool_name(payload: &serde_json::Value) -> Option<String> {
    payload.get("tool_name").and_then(serde_json::Value::as_str).map(str::to_string)
}

fn error_text(payload: &serde_json::Value) -> Option<String> {
    payload.get("error").and_then(serde_json::Value::as_str).map(str::to_string)
}

fn confidence_for(hint: &FailureHint, error_messages: &[String]) -> f64 {
    match hint {
        FailureHint::Cyclic { .. } | FailureHint::BlockedCommands => 0.8,
        FailureHint::Regression { .. } => 0.7,
        FailureHint::Stall | FailureHint::BudgetExceeded if !error_messages.is_empty() => 0.5,
        FailureHint::Stall | FailureHint::BudgetExceeded => 0.3,
        FailureHint::Crash => 0.2,
    }
}

fn likely_cause(hint: &FailureHint, error_messages: &[String]) -> Option<String> {
    match hint {
        FailureHint::Cyclic { feature_id, count } => Some(format!(
            "the same failure recurred {count} times{}",
            feature_id.map(|f| format!(" while working feature {f}")).unwrap_or_default()
        )),
        FailureHint::BlockedCommands => {
            Some("the agent repeatedly attempted a command the Security Gate denies".to_string())
        },
        FailureHint::Stall => Some("no tool call was observed before the stall timeout elapsed".to_string()),
        FailureHint::BudgetExceeded => Some("the session's token/cost budget was exhausted".to_string()),
        FailureHint::Crash => Some("the process exited without a SESSION_END event".to_string()),
        FailureHint::Regression { feature_index } => {
            Some(format!("feature {feature_index} no longer passes verification"))
        },
    }
    .or_else(|| error_messages.last().cloned())
}

/// A clean bill of health: no watchdog flag, no crash, no regression.
/// Exists so a session's settle step can persist a positive report
/// and Warm/Cold memory has something to reference besides silence.
#[must_use]
pub fn ok_report(session_id: SessionId) -> FailureReport {
    FailureReport {
        id: FailureReportId::new(session_id.get()),
        session_id,
        category: FailureCategory::Ok,
        last_successful_action: None,
        failing_action: None,
        error_messages: Vec::new(),
        likely_cause: None,
        confidence: 1.0,
        similar_past_failures: Vec::new(),
        suggested_fixes: Vec::new(),
    }
}
