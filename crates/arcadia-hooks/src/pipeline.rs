//! The `HookPipeline`: the fixed stage sequence every tool invocation
//! passes through (§4.9).
//!
//! Grounded on the staged-interceptor composition pattern — a single
//! method threading a context through named stages in order, returning
//! the moment a stage produces a terminal decision — generalized from
//! the teacher's policy/capability/budget/approval intersection to this
//! system's security/risk/autonomy/checkpoint sequence. The teacher's
//! capability-token and cryptographic-audit concerns have no
//! counterpart here; the Event Log is this pipeline's audit trail.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use arcadia_autonomy::{AutonomyGate, Outcome};
use arcadia_checkpoint::CheckpointManager;
use arcadia_core::{EventType, SessionId};
use arcadia_events::{Event, EventLog};
use arcadia_risk::{RiskAssessment, RiskClassifier};
use arcadia_security::{GateDecision, SecurityPolicy, ToolAction};
use arcadia_storage::models::{AutonomyDecision, CheckpointTrigger, RiskPattern};
use arcadia_storage::AutonomyStore;
use serde_json::json;

use crate::approval::{ApprovalGateway, ApprovalOutcome};
use crate::context::{PipelineTrigger, ToolCallContext};
use crate::error::{HookError, HookResult};
use crate::executor::{ToolExecutor, ToolFailure, ToolOutcome};

/// What the pipeline hands back for a completed (non-denied) call.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// The tool's output.
    pub output: String,
    /// Set if this call completed a feature and a `FEATURE_COMPLETE`
    /// checkpoint was taken as a result.
    pub feature_completed: Option<i64>,
}

/// Reduce a [`ToolAction`]-shaped invocation for the Security Gate from
/// the richer [`arcadia_risk::ToolInvocation`] the rest of the pipeline
/// uses. The gate only needs the narrower shape.
fn to_gate_action(invocation: &arcadia_risk::ToolInvocation) -> Option<ToolAction> {
    use arcadia_risk::ToolInvocation as RiskInvocation;
    match invocation {
        RiskInvocation::FileRead { path } => Some(ToolAction::FileRead { path: path.clone() }),
        RiskInvocation::FileWrite { path } => Some(ToolAction::FileWrite { path: path.clone() }),
        RiskInvocation::FileDelete { path } => Some(ToolAction::FileDelete { path: path.clone() }),
        RiskInvocation::ExecuteCommand { command, args } => Some(ToolAction::ExecuteCommand {
            command: command.clone(),
            args: args.clone(),
        }),
        RiskInvocation::NetworkRequest { host, port } => {
            Some(ToolAction::NetworkRequest { host: host.clone(), port: *port })
        },
        // TransmitData/Named have no Security Gate counterpart — the
        // gate's hard boundaries don't apply to them, so they pass
        // straight through to the Risk Classifier.
        RiskInvocation::TransmitData { .. } | RiskInvocation::Named { .. } => None,
    }
}

/// Runs every tool invocation through the Security Gate, Risk
/// Classifier, Autonomy Manager, and Checkpoint Manager before
/// dispatch, then records the result.
pub struct HookPipeline<'a> {
    security: SecurityPolicy,
    risk_classifier: RiskClassifier,
    risk_patterns: Vec<RiskPattern>,
    autonomy_gate: AutonomyGate,
    autonomy_store: AutonomyStore<'a>,
    checkpoints: CheckpointManager<'a>,
    checkpoint_sequences: Mutex<HashMap<SessionId, u32>>,
    decision_sequences: Mutex<HashMap<SessionId, u32>>,
    events: Arc<EventLog>,
    executor: Arc<dyn ToolExecutor>,
    approval: Arc<dyn ApprovalGateway>,
}

impl<'a> HookPipeline<'a> {
    /// Assemble a pipeline from its staged components.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        security: SecurityPolicy,
        risk_classifier: RiskClassifier,
        risk_patterns: Vec<RiskPattern>,
        autonomy_gate: AutonomyGate,
        autonomy_store: AutonomyStore<'a>,
        checkpoints: CheckpointManager<'a>,
        events: Arc<EventLog>,
        executor: Arc<dyn ToolExecutor>,
        approval: Arc<dyn ApprovalGateway>,
    ) -> Self {
        Self {
            security,
            risk_classifier,
            risk_patterns,
            autonomy_gate,
            autonomy_store,
            checkpoints,
            checkpoint_sequences: Mutex::new(HashMap::new()),
            decision_sequences: Mutex::new(HashMap::new()),
            events,
            executor,
            approval,
        }
    }

    /// Run one tool invocation through every stage in order, returning
    /// early the moment a stage produces a terminal decision.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::SecurityDenied`] if stage 1 denies the
    /// action, [`HookError::AutonomyDenied`] or
    /// [`HookError::ApprovalRefused`]/[`HookError::ApprovalTimedOut`] if
    /// stage 3 does, [`HookError::ToolFailed`] if dispatch fails, or a
    /// storage/event/checkpoint error if any stage's persistence fails.
    pub async fn run_tool_call(&self, ctx: ToolCallContext) -> HookResult<PipelineOutcome> {
        // Step 1: Security Gate.
        if let Some(action) = to_gate_action(&ctx.invocation) {
            if let GateDecision::Deny { reason } = self.security.check(&action) {
                self.emit(&ctx, EventType::ToolBlocked, json!({ "reason": reason })).await?;
                return Err(HookError::SecurityDenied { reason });
            }
        }

        // Step 2: Risk Classifier.
        let assessment = self.risk_classifier.classify(&ctx.invocation, &self.risk_patterns);

        // Step 3: Autonomy Manager.
        let metrics = self.autonomy_store.metrics(ctx.session_id).await?;
        let gate_result =
            self.autonomy_gate.evaluate(&metrics, &ctx.tool_name, &ctx.invocation, &assessment);

        self.log_decision(&ctx, &gate_result).await?;

        if !gate_result.allow {
            self.emit(
                &ctx,
                EventType::Decision,
                json!({ "decision": "denied", "reason": gate_result.reason }),
            )
            .await?;
            return Err(HookError::AutonomyDenied { reason: gate_result.reason });
        }

        if gate_result.requires_approval {
            match self.approval.request_approval(&ctx, &assessment).await {
                ApprovalOutcome::Approved => {},
                ApprovalOutcome::Denied { reason } => {
                    self.emit(
                        &ctx,
                        EventType::Decision,
                        json!({ "decision": "approval_denied", "reason": reason }),
                    )
                    .await?;
                    return Err(HookError::ApprovalRefused { reason });
                },
                ApprovalOutcome::TimedOut => {
                    self.emit(
                        &ctx,
                        EventType::Decision,
                        json!({ "decision": "approval_timed_out" }),
                    )
                    .await?;
                    return Err(HookError::ApprovalTimedOut);
                },
            }
        }

        // Step 4: Checkpoint Manager.
        if gate_result.requires_checkpoint || ctx.trigger == PipelineTrigger::BeforeRiskyOp {
            self.take_checkpoint(&ctx, CheckpointTrigger::BeforeRiskyOp).await?;
        }

        // Step 5: Observability (TOOL_CALL).
        self.emit(
            &ctx,
            EventType::ToolCall,
            json!({ "tool": ctx.tool_name, "invocation": ctx.invocation }),
        )
        .await?;

        // Step 6: EXEC.
        let started = std::time::Instant::now();
        let dispatch = self.executor.execute(&ctx).await;
        let duration_ms = started.elapsed().as_millis();

        // Step 7: Observability (TOOL_RESULT/TOOL_ERROR) + autonomy update.
        match dispatch {
            Ok(outcome) => {
                self.emit(
                    &ctx,
                    EventType::ToolResult,
                    json!({ "tool": ctx.tool_name, "duration_ms": duration_ms, "output": outcome.output }),
                )
                .await?;

                let updated = self.autonomy_gate.record_outcome(&metrics, Outcome::Success);
                self.autonomy_store.put_metrics(&updated).await?;

                if gate_result.requires_approval {
                    self.approval.record_outcome(&ctx, true).await;
                }

                if let Some(feature_index) = outcome.feature_completed {
                    self.take_checkpoint(&ctx, CheckpointTrigger::FeatureComplete).await?;
                    return Ok(PipelineOutcome {
                        output: outcome.output,
                        feature_completed: Some(feature_index),
                    });
                }

                Ok(PipelineOutcome { output: outcome.output, feature_completed: None })
            },
            Err(ToolFailure { message }) => {
                self.emit(
                    &ctx,
                    EventType::ToolError,
                    json!({ "tool": ctx.tool_name, "duration_ms": duration_ms, "message": message }),
                )
                .await?;

                let updated = self.autonomy_gate.record_outcome(&metrics, Outcome::Error);
                self.autonomy_store.put_metrics(&updated).await?;

                if gate_result.requires_approval {
                    self.approval.record_outcome(&ctx, false).await;
                }

                Err(HookError::ToolFailed(message))
            },
        }
    }

    async fn emit(
        &self,
        ctx: &ToolCallContext,
        event_type: EventType,
        mut payload: serde_json::Value,
    ) -> HookResult<()> {
        if let Some(obj) = payload.as_object_mut() {
            obj.insert("invocation_id".to_string(), json!(ctx.invocation_id.to_string()));
        }
        self.events.append(Event::new(ctx.session_id, event_type, payload)).await?;
        Ok(())
    }

    async fn log_decision(
        &self,
        ctx: &ToolCallContext,
        gate_result: &arcadia_autonomy::GateResult,
    ) -> HookResult<()> {
        // No central id allocator exists yet (mirrors `checkpoint_id`'s
        // session-scoped derivation in `arcadia-checkpoint`): a
        // decision's id is its session plus a per-session counter.
        let sequence = {
            let mut sequences = self
                .decision_sequences
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let counter = sequences.entry(ctx.session_id).or_insert(0);
            *counter += 1;
            *counter
        };

        let decision = AutonomyDecision {
            id: arcadia_core::DecisionId::new(
                ctx.session_id.get().saturating_mul(1_000_000) + i64::from(sequence),
            ),
            session_id: ctx.session_id,
            timestamp: chrono::Utc::now(),
            tool_name: ctx.tool_name.clone(),
            level_required: gate_result.required_level,
            level_current: gate_result.effective_level,
            allowed: gate_result.allow,
            reason: gate_result.reason.clone(),
        };
        self.autonomy_store.log_decision(&decision).await?;
        Ok(())
    }

    /// Sequence-number and take a checkpoint for `ctx`'s session,
    /// scoped per `(session_id, trigger)` so unrelated triggers never
    /// collide on the idempotency marker.
    async fn take_checkpoint(
        &self,
        ctx: &ToolCallContext,
        trigger: CheckpointTrigger,
    ) -> HookResult<()> {
        let sequence = {
            let mut sequences = self
                .checkpoint_sequences
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let counter = sequences.entry(ctx.session_id).or_insert(0);
            *counter += 1;
            *counter
        };

        self.checkpoints
            .checkpoint(ctx.session_id, trigger, sequence, json!({}), None, None)
            .await?;
        self.emit(ctx, EventType::Checkpoint, json!({ "trigger": format!("{trigger:?}") })).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcadia_autonomy::AutonomyConfig;
    use arcadia_risk::ToolInvocation;
    use arcadia_storage::Database;
    use std::process::Command;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn init_repo() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let run = |args: &[&str]| {
            Command::new("git").current_dir(dir.path()).args(args).output().unwrap()
        };
        run(&["init", "-q"]);
        run(&["config", "user.email", "test@example.com"]);
        run(&["config", "user.name", "test"]);
        std::fs::write(dir.path().join("README.md"), "seed").unwrap();
        run(&["add", "-A"]);
        run(&["commit", "-q", "-m", "seed"]);
        dir
    }

    struct StubExecutor {
        calls: AtomicUsize,
        fail: bool,
        completes_feature: Option<i64>,
    }

    #[async_trait::async_trait]
    impl ToolExecutor for StubExecutor {
        async fn execute(&self, _ctx: &ToolCallContext) -> Result<ToolOutcome, ToolFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ToolFailure::new("boom"));
            }
            let mut outcome = ToolOutcome::new("done");
            if let Some(feature) = self.completes_feature {
                outcome = outcome.completing_feature(feature);
            }
            Ok(outcome)
        }
    }

    struct StubApproval {
        outcome: ApprovalOutcome,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl ApprovalGateway for StubApproval {
        async fn request_approval(
            &self,
            _ctx: &ToolCallContext,
            _assessment: &RiskAssessment,
        ) -> ApprovalOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn make_pipeline<'a>(
        db: &'a Database,
        repo: &TempDir,
        events: Arc<EventLog>,
        executor: Arc<dyn ToolExecutor>,
        approval: Arc<dyn ApprovalGateway>,
    ) -> HookPipeline<'a> {
        HookPipeline::new(
            SecurityPolicy::default(),
            RiskClassifier::new(),
            Vec::new(),
            AutonomyGate::new(AutonomyConfig::default()),
            AutonomyStore::new(db),
            CheckpointManager::new(repo.path(), arcadia_storage::CheckpointStore::new(db)),
            events,
            executor,
            approval,
        )
    }

    async fn open_events() -> (Arc<EventLog>, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let log = EventLog::open(dir.path().join("events.jsonl")).await.unwrap();
        (Arc::new(log), dir)
    }

    #[tokio::test]
    async fn denied_by_security_gate_emits_tool_blocked_and_skips_exec() {
        let db = Database::connect_memory().await.unwrap();
        let repo = init_repo();
        let (events, _events_dir) = open_events().await;
        let executor = Arc::new(StubExecutor { calls: AtomicUsize::new(0), fail: false, completes_feature: None });
        let approval = Arc::new(StubApproval { outcome: ApprovalOutcome::Approved, calls: AtomicUsize::new(0) });
        let pipeline = make_pipeline(&db, &repo, events.clone(), executor.clone(), approval);

        let ctx = ToolCallContext::new(
            SessionId::new(1),
            "shell",
            ToolInvocation::ExecuteCommand { command: "sudo".into(), args: vec![] },
        );
        let result = pipeline.run_tool_call(ctx).await;

        assert!(matches!(result, Err(HookError::SecurityDenied { .. })));
        assert_eq!(executor.calls.load(Ordering::SeqCst), 0);

        let recorded = events.iter_all().await.unwrap();
        assert!(recorded.iter().any(|e| e.event_type == EventType::ToolBlocked));
    }

    #[tokio::test]
    async fn observe_level_blocks_a_write_with_no_approval_configured() {
        let db = Database::connect_memory().await.unwrap();
        let repo = init_repo();
        let (events, _events_dir) = open_events().await;
        let executor = Arc::new(StubExecutor { calls: AtomicUsize::new(0), fail: false, completes_feature: None });
        let approval = Arc::new(StubApproval { outcome: ApprovalOutcome::Approved, calls: AtomicUsize::new(0) });
        let pipeline = make_pipeline(&db, &repo, events, executor.clone(), approval);

        let ctx = ToolCallContext::new(
            SessionId::new(1),
            "file_write",
            ToolInvocation::FileWrite { path: "/tmp/f".into() },
        );
        let result = pipeline.run_tool_call(ctx).await;

        assert!(matches!(result, Err(HookError::AutonomyDenied { .. })));
        assert_eq!(executor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn approval_denied_short_circuits_before_exec() {
        let db = Database::connect_memory().await.unwrap();
        let repo = init_repo();
        let (events, _events_dir) = open_events().await;
        let session = SessionId::new(1);

        // Promote to ExecuteSafe so the write clears the autonomy gate
        // and reaches the approval stage.
        let autonomy_store = AutonomyStore::new(&db);
        let mut metrics = autonomy_store.metrics(session).await.unwrap();
        metrics.current_level = arcadia_storage::models::AutonomyLevel::ExecuteSafe;
        autonomy_store.put_metrics(&metrics).await.unwrap();

        let executor = Arc::new(StubExecutor { calls: AtomicUsize::new(0), fail: false, completes_feature: None });
        let approval = Arc::new(StubApproval {
            outcome: ApprovalOutcome::Denied { reason: "no".into() },
            calls: AtomicUsize::new(0),
        });
        let pipeline = make_pipeline(&db, &repo, events, executor.clone(), approval.clone());

        let ctx = ToolCallContext::new(
            session,
            "file_delete",
            ToolInvocation::FileDelete { path: "/tmp/f".into() },
        );
        let result = pipeline.run_tool_call(ctx).await;

        assert!(matches!(result, Err(HookError::ApprovalRefused { .. })));
        assert_eq!(approval.calls.load(Ordering::SeqCst), 1);
        assert_eq!(executor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn successful_write_at_sufficient_level_dispatches_and_promotes_on_success() {
        let db = Database::connect_memory().await.unwrap();
        let repo = init_repo();
        let (events, _events_dir) = open_events().await;
        let session = SessionId::new(1);

        let autonomy_store = AutonomyStore::new(&db);
        let mut metrics = autonomy_store.metrics(session).await.unwrap();
        metrics.current_level = arcadia_storage::models::AutonomyLevel::ExecuteSafe;
        autonomy_store.put_metrics(&metrics).await.unwrap();

        let executor = Arc::new(StubExecutor { calls: AtomicUsize::new(0), fail: false, completes_feature: None });
        let approval = Arc::new(StubApproval { outcome: ApprovalOutcome::Approved, calls: AtomicUsize::new(0) });
        let pipeline = make_pipeline(&db, &repo, events.clone(), executor.clone(), approval);

        let ctx = ToolCallContext::new(
            session,
            "file_write",
            ToolInvocation::FileWrite { path: "/tmp/f".into() },
        );
        let result = pipeline.run_tool_call(ctx).await.unwrap();

        assert_eq!(result.output, "done");
        assert_eq!(executor.calls.load(Ordering::SeqCst), 1);

        let updated = autonomy_store.metrics(session).await.unwrap();
        assert_eq!(updated.consecutive_successes, 1);

        let recorded = events.iter_all().await.unwrap();
        assert!(recorded.iter().any(|e| e.event_type == EventType::ToolResult));
    }

    #[tokio::test]
    async fn feature_completion_fires_a_feature_complete_checkpoint() {
        let db = Database::connect_memory().await.unwrap();
        let repo = init_repo();
        let (events, _events_dir) = open_events().await;
        let session = SessionId::new(1);

        let autonomy_store = AutonomyStore::new(&db);
        let mut metrics = autonomy_store.metrics(session).await.unwrap();
        metrics.current_level = arcadia_storage::models::AutonomyLevel::ExecuteSafe;
        autonomy_store.put_metrics(&metrics).await.unwrap();

        let executor = Arc::new(StubExecutor { calls: AtomicUsize::new(0), fail: false, completes_feature: Some(7) });
        let approval = Arc::new(StubApproval { outcome: ApprovalOutcome::Approved, calls: AtomicUsize::new(0) });
        let pipeline = make_pipeline(&db, &repo, events.clone(), executor, approval);

        let ctx = ToolCallContext::new(
            session,
            "file_write",
            ToolInvocation::FileWrite { path: "/tmp/f".into() },
        )
        .with_feature(7);
        let result = pipeline.run_tool_call(ctx).await.unwrap();

        assert_eq!(result.feature_completed, Some(7));

        let recorded = events.iter_all().await.unwrap();
        let checkpoints = recorded.iter().filter(|e| e.event_type == EventType::Checkpoint).count();
        assert_eq!(checkpoints, 1, "only the feature-complete checkpoint, none before exec for a plain write");
    }

    #[tokio::test]
    async fn failed_dispatch_emits_tool_error_and_demotes_on_repeated_failure() {
        let db = Database::connect_memory().await.unwrap();
        let repo = init_repo();
        let (events, _events_dir) = open_events().await;
        let session = SessionId::new(1);

        let autonomy_store = AutonomyStore::new(&db);
        let mut metrics = autonomy_store.metrics(session).await.unwrap();
        metrics.current_level = arcadia_storage::models::AutonomyLevel::ExecuteSafe;
        autonomy_store.put_metrics(&metrics).await.unwrap();

        let executor = Arc::new(StubExecutor { calls: AtomicUsize::new(0), fail: true, completes_feature: None });
        let approval = Arc::new(StubApproval { outcome: ApprovalOutcome::Approved, calls: AtomicUsize::new(0) });
        let pipeline = make_pipeline(&db, &repo, events.clone(), executor.clone(), approval);

        for _ in 0..3 {
            let ctx = ToolCallContext::new(
                session,
                "file_write",
                ToolInvocation::FileWrite { path: "/tmp/f".into() },
            );
            let result = pipeline.run_tool_call(ctx).await;
            assert!(matches!(result, Err(HookError::ToolFailed(_))));
        }

        let updated = autonomy_store.metrics(session).await.unwrap();
        assert_eq!(updated.current_level, arcadia_storage::models::AutonomyLevel::Plan);

        let recorded = events.iter_all().await.unwrap();
        assert!(recorded.iter().any(|e| e.event_type == EventType::ToolError));
    }
}
