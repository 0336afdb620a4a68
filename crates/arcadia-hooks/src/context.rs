//! The context threaded through every pipeline stage.

use arcadia_core::{InvocationId, SessionId};
use arcadia_risk::ToolInvocation;
use serde_json::Value;

/// What triggered this tool invocation, beyond ordinary agent action
/// selection. The Checkpoint Manager stage (step 4) treats
/// [`PipelineTrigger::BeforeRiskyOp`] the same as a risk-assessment
/// `requires_checkpoint` flag: either one forces a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineTrigger {
    /// An ordinary step in the agent's plan.
    Normal,
    /// The caller has already identified this invocation as risky
    /// (e.g. the supervisor is about to let the agent touch a feature
    /// it previously broke) independent of what the Risk Classifier
    /// says.
    BeforeRiskyOp,
}

/// Everything the pipeline's stages need to evaluate and run one tool
/// invocation.
#[derive(Debug, Clone)]
pub struct ToolCallContext {
    /// The session the invocation belongs to.
    pub session_id: SessionId,
    /// Correlates this call's `TOOL_CALL` event with its eventual
    /// `TOOL_RESULT`/`TOOL_ERROR`/`TOOL_BLOCKED` event.
    pub invocation_id: InvocationId,
    /// The tool's registered name, used for the Autonomy Manager's
    /// per-tool override table.
    pub tool_name: String,
    /// The invocation as the Risk Classifier sees it.
    pub invocation: ToolInvocation,
    /// Why this invocation is being run right now.
    pub trigger: PipelineTrigger,
    /// The feature this invocation is working toward, if any. Carried
    /// through so a successful `mark_passing` result can be correlated
    /// back to its checkpoint at stage 7.
    pub feature_index: Option<i64>,
    /// The tool call's raw JSON arguments, as the agent sent them.
    /// [`ToolInvocation`] only carries what the Risk Classifier needs
    /// (a path, a command, a destination); the Tool Registry's EXEC
    /// stage needs the rest (file contents, edit ranges, a grep
    /// pattern separate from its search root), so the full payload
    /// rides along here rather than being reconstructed from the risk
    /// view.
    pub raw_input: Value,
}

impl ToolCallContext {
    /// Build a context for an ordinary (non-risky-by-trigger) call.
    #[must_use]
    pub fn new(session_id: SessionId, tool_name: impl Into<String>, invocation: ToolInvocation) -> Self {
        Self {
            session_id,
            invocation_id: InvocationId::new(),
            tool_name: tool_name.into(),
            invocation,
            trigger: PipelineTrigger::Normal,
            feature_index: None,
            raw_input: Value::Null,
        }
    }

    /// Mark this call as targeting a specific feature.
    #[must_use]
    pub fn with_feature(mut self, feature_index: i64) -> Self {
        self.feature_index = Some(feature_index);
        self
    }

    /// Attach the tool call's raw JSON arguments.
    #[must_use]
    pub fn with_raw_input(mut self, raw_input: Value) -> Self {
        self.raw_input = raw_input;
        self
    }

    /// Mark this call as triggered `BEFORE_RISKY_OP`.
    #[must_use]
    pub fn before_risky_op(mut self) -> Self {
        self.trigger = PipelineTrigger::BeforeRiskyOp;
        self
    }
}
