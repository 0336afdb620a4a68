//! Event type tags shared across every crate that appends to, or reads
//! from, the Event Log (§3, §4.2).

use serde::{Deserialize, Serialize};
use std::fmt;

/// The `type` discriminant of an Event row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A session began.
    SessionStart,
    /// A session ended (normally or synthetically, on crash recovery).
    SessionEnd,
    /// The agent invoked a tool.
    ToolCall,
    /// A tool invocation completed successfully.
    ToolResult,
    /// A tool invocation failed.
    ToolError,
    /// The Security Gate denied a tool invocation outright.
    ToolBlocked,
    /// A gated decision was made (autonomy gate, escalation, learned
    /// intervention auto-apply).
    Decision,
    /// A checkpoint was created or a rollback occurred.
    Checkpoint,
    /// An Injection Point was opened.
    Injection,
    /// An escalation rule fired.
    Escalation,
    /// A supervisor-level error occurred.
    Error,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionStart => write!(f, "session_start"),
            Self::SessionEnd => write!(f, "session_end"),
            Self::ToolCall => write!(f, "tool_call"),
            Self::ToolResult => write!(f, "tool_result"),
            Self::ToolError => write!(f, "tool_error"),
            Self::ToolBlocked => write!(f, "tool_blocked"),
            Self::Decision => write!(f, "decision"),
            Self::Checkpoint => write!(f, "checkpoint"),
            Self::Injection => write!(f, "injection"),
            Self::Escalation => write!(f, "escalation"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_serde_tag() {
        for ty in [
            EventType::SessionStart,
            EventType::ToolCall,
            EventType::ToolBlocked,
            EventType::Decision,
        ] {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{ty}\""));
        }
    }
}
