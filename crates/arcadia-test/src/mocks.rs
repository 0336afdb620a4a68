//! [`ScriptedRuntime`]: an [`AgentRuntime`] stub that plays back a
//! fixed sequence of turns instead of calling out to a real model,
//! grounded on a mock-with-an-internal-queue pattern (consume one
//! scripted response per call, error once the queue runs dry).

use arcadia_core::runtime::{AgentRuntime, RuntimeEvent, RuntimeTurn, ToolCatalogEntry, TokenUsage};
use async_trait::async_trait;
use std::sync::Mutex;

/// Raised when [`ScriptedRuntime`] is asked for more turns than it was
/// scripted with.
#[derive(Debug, thiserror::Error)]
pub enum ScriptedRuntimeError {
    /// The scripted turn sequence was exhausted.
    #[error("scripted runtime has no more turns queued")]
    ScriptExhausted,
}

/// An [`AgentRuntime`] that returns one pre-scripted [`RuntimeTurn`]
/// per call to `run_turn`, in order, and fails once the script is
/// exhausted — for exercising the Session Supervisor without a real
/// LLM-backed runtime.
pub struct ScriptedRuntime {
    turns: Mutex<std::collections::VecDeque<RuntimeTurn>>,
}

impl ScriptedRuntime {
    /// Script `turns`, returned in order on successive `run_turn` calls.
    #[must_use]
    pub fn new(turns: Vec<RuntimeTurn>) -> Self {
        Self { turns: Mutex::new(turns.into_iter().collect()) }
    }

    /// A turn that invokes `tool_name` once with `input`.
    #[must_use]
    pub fn tool_call_turn(tool_name: impl Into<String>, input: serde_json::Value) -> RuntimeTurn {
        RuntimeTurn {
            events: vec![RuntimeEvent::ToolCall { name: tool_name.into(), input }],
            usage: TokenUsage { input_tokens: 100, output_tokens: 20 },
        }
    }

    /// A turn that emits plain text and no tool calls — the shape a
    /// real runtime would produce when it considers its work done.
    #[must_use]
    pub fn completed_turn() -> RuntimeTurn {
        RuntimeTurn {
            events: vec![RuntimeEvent::Message { text: "done".to_string() }],
            usage: TokenUsage { input_tokens: 50, output_tokens: 5 },
        }
    }
}

#[async_trait]
impl AgentRuntime for ScriptedRuntime {
    type Error = ScriptedRuntimeError;

    async fn run_turn(
        &self,
        _system_prompt: &str,
        _tool_catalog: &[ToolCatalogEntry],
        _user_prompt: &str,
    ) -> Result<RuntimeTurn, Self::Error> {
        let mut turns = self.turns.lock().expect("scripted runtime mutex poisoned");
        turns.pop_front().ok_or(ScriptedRuntimeError::ScriptExhausted)
    }
}
