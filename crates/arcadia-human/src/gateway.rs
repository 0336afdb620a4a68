//! [`HumanGateway`]: the Human Channel's [`ApprovalGateway`]
//! implementation.
//!
//! Before opening an Injection Point, checks whether a learned
//! Intervention Pattern already answers this exact situation
//! confidently enough to short-circuit (`InterventionStore::get_pattern`).
//! Otherwise it opens a pending row and polls the store with
//! exponential backoff until a human resolves it (writing directly to
//! the store from an out-of-process CLI or dashboard) or `timeout_s`
//! elapses, at which point `default_on_timeout` is applied. Grounded on
//! `ApprovalManager::check_approval`'s allowance-then-handler ordering,
//! with the handler's blocking wait replaced by polling since this
//! system's human responses arrive out-of-process rather than over an
//! in-process channel.
//!
//! Holds an owned `Arc<Database>` rather than the borrowed stores the
//! rest of the codebase builds per call — this gateway is itself
//! stored as `Arc<dyn ApprovalGateway>` inside `HookPipeline`, which
//! needs it to outlive any single pipeline invocation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use arcadia_core::{InjectionPointId, SessionId};
use arcadia_hooks::{ApprovalGateway, ApprovalOutcome, ToolCallContext};
use arcadia_risk::RiskAssessment;
use arcadia_storage::models::{AutonomyLevel, InjectionPoint, InjectionStatus, InjectionType};
use arcadia_storage::{AutonomyStore, Database, InjectionStore, InterventionStore, StorageResult};
use async_trait::async_trait;

use crate::learning;
use crate::signature::fingerprint;

const INITIAL_POLL_INTERVAL: Duration = Duration::from_millis(50);
const MAX_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_TIMEOUT_S: u64 = 300;

/// Opens and resolves Injection Points for gated tool calls, learning
/// from how humans answer them.
pub struct HumanGateway {
    db: Arc<Database>,
    injection_sequences: Mutex<HashMap<SessionId, u32>>,
}

impl HumanGateway {
    /// Wrap the database this gateway's stores read and write.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db, injection_sequences: Mutex::new(HashMap::new()) }
    }

    fn injections(&self) -> InjectionStore<'_> {
        InjectionStore::new(&self.db)
    }

    fn interventions(&self) -> InterventionStore<'_> {
        InterventionStore::new(&self.db)
    }

    async fn signature_for(&self, ctx: &ToolCallContext) -> String {
        let level = AutonomyStore::new(&self.db)
            .metrics(ctx.session_id)
            .await
            .map(|m| m.current_level)
            .unwrap_or(AutonomyLevel::Observe);
        fingerprint(&ctx.tool_name, ctx.feature_index, ctx.invocation.kind(), level)
    }

    fn next_id(&self, session_id: SessionId) -> InjectionPointId {
        let mut sequences = self
            .injection_sequences
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let counter = sequences.entry(session_id).or_insert(0);
        *counter += 1;
        InjectionPointId::new(session_id.get().saturating_mul(1_000_000) + i64::from(*counter))
    }

    /// Poll `id` until it leaves `Pending`, applying `default_on_timeout`
    /// once `timeout_s` elapses with no response.
    async fn poll_until_resolved(
        &self,
        id: InjectionPointId,
        timeout_s: u64,
        default_on_timeout: &str,
    ) -> StorageResult<InjectionPoint> {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(timeout_s);
        let mut interval = INITIAL_POLL_INTERVAL;
        loop {
            let point = self.injections().get(id).await?;
            if point.status != InjectionStatus::Pending {
                return Ok(point);
            }
            let now = tokio::time::Instant::now();
            if now >= deadline {
                return self
                    .injections()
                    .resolve(
                        id,
                        InjectionStatus::Timeout,
                        default_on_timeout.to_string(),
                        "system:timeout".to_string(),
                    )
                    .await;
            }
            tokio::time::sleep(interval.min(deadline.saturating_duration_since(now))).await;
            interval = (interval * 2).min(MAX_POLL_INTERVAL);
        }
    }
}

#[async_trait]
impl ApprovalGateway for HumanGateway {
    async fn request_approval(
        &self,
        ctx: &ToolCallContext,
        assessment: &RiskAssessment,
    ) -> ApprovalOutcome {
        let signature = self.signature_for(ctx).await;

        if let Ok(Some(pattern)) = self.interventions().get_pattern(&signature).await {
            if pattern.auto_apply {
                tracing::info!(
                    signature = %signature,
                    response = %pattern.preferred_response,
                    "auto-applying learned intervention"
                );
                return response_to_outcome(&pattern.preferred_response);
            }
        }

        let point = InjectionPoint {
            id: self.next_id(ctx.session_id),
            session_id: ctx.session_id,
            injection_type: InjectionType::Approval,
            created_at: chrono::Utc::now(),
            context: format!("{} requires approval: {}", ctx.tool_name, ctx.invocation.rendered()),
            options: vec!["approve".to_string(), "deny".to_string()],
            recommendation: assessment.mitigation.clone(),
            timeout_s: DEFAULT_TIMEOUT_S,
            default_on_timeout: Some("deny".to_string()),
            status: InjectionStatus::Pending,
            response: None,
            responded_by: None,
        };

        let opened = match self.injections().open(&point).await {
            Ok(opened) => opened,
            Err(e) => {
                tracing::error!("failed to open injection point: {e}");
                return ApprovalOutcome::Denied { reason: format!("could not open injection point: {e}") };
            },
        };

        let resolved = match self
            .poll_until_resolved(opened.id, opened.timeout_s, opened.default_on_timeout.as_deref().unwrap_or("deny"))
            .await
        {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::error!("failed to poll injection point: {e}");
                return ApprovalOutcome::Denied { reason: format!("injection point poll failed: {e}") };
            },
        };

        match resolved.status {
            InjectionStatus::Responded => {
                if let Err(e) = learning::record_response(&self.interventions(), &resolved, &signature).await {
                    tracing::warn!("failed to record intervention: {e}");
                }
                response_to_outcome(resolved.response.as_deref().unwrap_or("deny"))
            },
            InjectionStatus::Timeout => {
                if resolved.response.as_deref() == Some("approve") {
                    ApprovalOutcome::Approved
                } else {
                    ApprovalOutcome::TimedOut
                }
            },
            InjectionStatus::Cancelled | InjectionStatus::Pending => ApprovalOutcome::TimedOut,
        }
    }

    async fn record_outcome(&self, ctx: &ToolCallContext, succeeded: bool) {
        let signature = self.signature_for(ctx).await;
        if let Err(e) = learning::record_outcome(&self.interventions(), &signature, succeeded).await {
            tracing::warn!("failed to update intervention pattern: {e}");
        }
    }
}

fn response_to_outcome(response: &str) -> ApprovalOutcome {
    if response == "approve" {
        ApprovalOutcome::Approved
    } else {
        ApprovalOutcome::Denied { reason: response.to_string() }
    }
}
