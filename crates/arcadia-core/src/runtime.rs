//! The agent runtime seam (§1, §6).
//!
//! The LLM runtime itself is out of scope; this module defines the
//! narrow async trait the Session Supervisor invokes against and the
//! event shapes it streams back. A concrete provider backend lives
//! outside this workspace; `arcadia-test` ships a scripted stub for
//! exercising the supervisor without one.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One entry of the tool catalog offered to the runtime for a turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCatalogEntry {
    /// Tool name as it appears in `tool_call(name, input)`.
    pub name: String,
    /// Human-readable description shown to the model.
    pub description: String,
    /// JSON Schema describing the tool's input shape.
    pub input_schema: serde_json::Value,
}

/// One event streamed back from a runtime turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RuntimeEvent {
    /// The model asked to invoke a tool.
    ToolCall {
        /// Name of the tool to invoke.
        name: String,
        /// Tool input, shaped per the tool's own schema.
        input: serde_json::Value,
    },
    /// The model emitted plain text.
    Message {
        /// The message text.
        text: String,
    },
}

/// Token accounting for a completed runtime turn. Required so the
/// Budget tracker can charge spend without the runtime leaking its own
/// provider-specific pricing details upward.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt (system + tool catalog + user turn).
    pub input_tokens: u64,
    /// Tokens the model generated this turn.
    pub output_tokens: u64,
}

/// Everything a single runtime turn returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeTurn {
    /// Events emitted during the turn, in emission order.
    pub events: Vec<RuntimeEvent>,
    /// Token usage for the turn.
    pub usage: TokenUsage,
}

/// The seam between the Session Supervisor and an LLM-backed coding
/// agent. Implementations own model selection, prompting, and streaming;
/// the supervisor only sees turns.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Errors a runtime implementation can surface to the supervisor.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run one turn: the runtime is given the system prompt, the tool
    /// catalog available this turn, and the user-facing prompt, and
    /// returns the events it produced plus token usage.
    async fn run_turn(
        &self,
        system_prompt: &str,
        tool_catalog: &[ToolCatalogEntry],
        user_prompt: &str,
    ) -> Result<RuntimeTurn, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_usage_defaults_to_zero() {
        let usage = TokenUsage::default();
        assert_eq!(usage.input_tokens, 0);
        assert_eq!(usage.output_tokens, 0);
    }

    #[test]
    fn runtime_event_serializes_as_tagged_enum() {
        let event = RuntimeEvent::ToolCall {
            name: "read_file".to_string(),
            input: serde_json::json!({"path": "src/main.rs"}),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("ToolCall").is_some());
    }
}
