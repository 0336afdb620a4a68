//! The approval seam used by step 3 when an invocation's
//! `requires_approval` flag is set.
//!
//! Grounded on the same shape as [`crate::executor::ToolExecutor`]:
//! the pipeline opens a request and blocks on *something* answering
//! it, without needing to know whether the answer came from a human,
//! a timeout default, or a learned Intervention Pattern short-circuit.
//! The Human Channel implements this trait.

use crate::context::ToolCallContext;
use arcadia_risk::RiskAssessment;
use async_trait::async_trait;

/// How an opened approval request was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// The action may proceed.
    Approved,
    /// The action was refused.
    Denied {
        /// Why it was refused.
        reason: String,
    },
    /// No response arrived before the timeout and the configured
    /// default-on-timeout resolved to a refusal.
    TimedOut,
}

/// Opens a blocking approval request for a gated tool invocation.
///
/// Implementations own the Injection Point lifecycle (creating the
/// row, polling for a response, applying a learned auto-apply pattern
/// or the timeout default); the pipeline only sees the final verdict.
#[async_trait]
pub trait ApprovalGateway: Send + Sync {
    /// Request approval for `ctx`, blocking until a human (or learned
    /// pattern) responds or the request times out.
    async fn request_approval(
        &self,
        ctx: &ToolCallContext,
        assessment: &RiskAssessment,
    ) -> ApprovalOutcome;

    /// Told how a call that went through [`Self::request_approval`]
    /// ultimately turned out, so a learned Intervention Pattern's
    /// success rate can be updated. A no-op for gateways that don't
    /// track patterns (e.g. test stubs).
    async fn record_outcome(&self, _ctx: &ToolCallContext, _succeeded: bool) {}
}
