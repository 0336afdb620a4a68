//! The EXEC-stage seam (step 6): dispatch to whatever registry
//! actually runs tools.
//!
//! The pipeline doesn't know how a tool runs — only that something
//! does, and that it reports back a plain success/failure plus an
//! optional feature completion. The Tool Registry implements this
//! trait; tests stand in a scripted one.

use crate::context::ToolCallContext;
use async_trait::async_trait;

/// The result of a tool that ran (as opposed to one blocked or denied
/// earlier in the pipeline).
#[derive(Debug, Clone)]
pub struct ToolOutcome {
    /// The tool's rendered output, shown to the agent.
    pub output: String,
    /// Set when this call's success caused a feature to pass (a
    /// successful `mark_passing`), so step 7 can fire a
    /// `FEATURE_COMPLETE` checkpoint.
    pub feature_completed: Option<i64>,
}

impl ToolOutcome {
    /// A successful outcome with no feature-completion side effect.
    #[must_use]
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            feature_completed: None,
        }
    }

    /// Mark this outcome as having completed a feature.
    #[must_use]
    pub fn completing_feature(mut self, feature_index: i64) -> Self {
        self.feature_completed = Some(feature_index);
        self
    }
}

/// A tool that ran but failed.
#[derive(Debug, Clone)]
pub struct ToolFailure {
    /// A human-readable description of what went wrong.
    pub message: String,
}

impl ToolFailure {
    /// Build a failure from any displayable error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Dispatches a tool invocation to wherever it actually runs.
///
/// Implementations own their own I/O (filesystem, shell, network);
/// the pipeline only sees the outcome.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Run the invocation described by `ctx`.
    async fn execute(&self, ctx: &ToolCallContext) -> Result<ToolOutcome, ToolFailure>;
}
