//! The `Supervisor`: drives one project through the full session loop
//! (§4.11) until a terminal condition is reached.
//!
//! Generic over `R: AgentRuntime` rather than holding a `dyn
//! AgentRuntime` — the trait's associated `Error` type makes an
//! unparameterized trait object unusable here, and nothing about the
//! supervisor needs to swap runtimes at a single call site the way it
//! does need to swap tool executors and approval gateways. Grounded on
//! `astrid-runtime/src/session.rs`'s per-session bundle of `Arc`-shared
//! subsystem handles, generalized to this system's
//! security/risk/autonomy/checkpoint/budget/watchdog set and
//! reconstructed per turn rather than held for a session's lifetime,
//! since every store type here borrows the database connection rather
//! than owning a share of it.

use std::path::PathBuf;
use std::sync::Arc;

use arcadia_analyzer::{FailureAnalyzer, FailureHint};
use arcadia_autonomy::{AutonomyConfig, AutonomyGate};
use arcadia_budget::{BudgetConfig, BudgetTracker};
use arcadia_checkpoint::CheckpointManager;
use arcadia_core::runtime::{AgentRuntime, RuntimeEvent, ToolCatalogEntry};
use arcadia_core::{dirs::ProjectHome, EventType, SessionId};
use arcadia_events::{Event, EventLog};
use arcadia_features::FeatureRegistry;
use arcadia_hooks::{ApprovalGateway, HookPipeline, ToolCallContext, ToolExecutor};
use arcadia_risk::RiskClassifier;
use arcadia_security::SecurityPolicy;
use arcadia_storage::models::{CheckpointTrigger, SessionStatus};
use arcadia_storage::{
    CheckpointStore, Database, FeatureStore, HypothesisStore, MemoryStore,
    RiskPatternStore, SessionStore,
};
use arcadia_memory::{MemoryManager, WarmSummary};

use crate::error::{SupervisorError, SupervisorResult};
use crate::invocation::classify_invocation;
use crate::lock::SupervisorLock;
use crate::pause::PausedSession;
use crate::prompt;
use crate::state::{SessionOutcome, SettleResult, WatchdogFlag};
use crate::watchdog::{hash_error_text, FailureSample, Watchdog, WatchdogConfig};

/// How the whole supervised run (potentially many sessions) concluded.
/// `arcadia-cli` maps this directly to the exit codes in §6.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitStatus {
    /// All features pass, or the runtime ended the run cleanly.
    Normal,
    /// Paused cleanly; a `.paused_session.json` snapshot was written.
    Paused,
    /// A session's budget cap was reached.
    BudgetExceeded,
    /// An unterminated prior session was found and recovered; the run
    /// stops here for an operator to look at rather than resuming
    /// autonomously.
    CrashRecoveryNeeded,
}

/// One bounded session's worth of progress, threaded from `RUN` into
/// `SETTLE`.
#[derive(Debug, Default)]
struct RunRecord {
    current_feature: Option<i64>,
    feature_completed_this_session: bool,
    tool_errors: Vec<String>,
}

/// Owns every long-lived handle a project's sessions need and drives
/// them through the state machine in order.
pub struct Supervisor<R: AgentRuntime> {
    project: ProjectHome,
    db: Database,
    events: Arc<EventLog>,
    runtime: R,
    executor: Arc<dyn ToolExecutor>,
    approval: Arc<dyn ApprovalGateway>,
    tool_catalog: Vec<ToolCatalogEntry>,
    security: SecurityPolicy,
    risk_classifier: RiskClassifier,
    autonomy_config: AutonomyConfig,
    budget_config: BudgetConfig,
    watchdog_config: WatchdogConfig,
    system_role_prompt: String,
}

impl<R: AgentRuntime> Supervisor<R> {
    /// Assemble a supervisor from its components. None of the
    /// per-session stores are constructed here — each session (and
    /// each turn within `RUN`) builds its own against `&self.db`.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        project: ProjectHome,
        db: Database,
        events: Arc<EventLog>,
        runtime: R,
        executor: Arc<dyn ToolExecutor>,
        approval: Arc<dyn ApprovalGateway>,
        tool_catalog: Vec<ToolCatalogEntry>,
        security: SecurityPolicy,
        risk_classifier: RiskClassifier,
        autonomy_config: AutonomyConfig,
        budget_config: BudgetConfig,
        watchdog_config: WatchdogConfig,
        system_role_prompt: impl Into<String>,
    ) -> Self {
        Self {
            project,
            db,
            events,
            runtime,
            executor,
            approval,
            tool_catalog,
            security,
            risk_classifier,
            autonomy_config,
            budget_config,
            watchdog_config,
            system_role_prompt: system_role_prompt.into(),
        }
    }

    fn repo_path(&self) -> PathBuf {
        self.project.root().to_path_buf()
    }

    /// Run sessions to completion: acquires `.arcadia/supervisor.lock`
    /// for the duration, performs crash recovery, then loops `INIT ->
    /// RESUMING? -> PREP -> RUN -> SETTLE -> END` until a terminal
    /// condition is reached.
    ///
    /// # Errors
    ///
    /// Returns an error if any stage's storage, event, or checkpoint
    /// operation fails.
    pub async fn run_to_completion(&self) -> SupervisorResult<ExitStatus> {
        let _lock = SupervisorLock::acquire(self.project.supervisor_lock_path())?;

        if self.recover_crash().await? {
            return Ok(ExitStatus::CrashRecoveryNeeded);
        }

        let mut resume = PausedSession::load(&self.project.paused_session_path())?;

        loop {
            let features = FeatureRegistry::new(FeatureStore::new(&self.db));
            if features.list().await?.iter().all(|f| f.passes) {
                return Ok(ExitStatus::Normal);
            }

            let session_id = self.next_session_id().await?;
            let (outcome, _settle) = self.run_one_session(session_id, resume.take()).await?;

            match outcome {
                SessionOutcome::Completed => continue,
                SessionOutcome::Watchdog(WatchdogFlag::BudgetExceeded) => {
                    return Ok(ExitStatus::BudgetExceeded);
                },
                SessionOutcome::Watchdog(_) => continue,
                SessionOutcome::Paused { .. } => return Ok(ExitStatus::Paused),
            }
        }
    }

    async fn next_session_id(&self) -> SupervisorResult<SessionId> {
        let sessions = SessionStore::new(&self.db);
        let next = sessions.list().await?.first().map_or(1, |s| s.id.get() + 1);
        Ok(SessionId::new(next))
    }

    /// Look for an unterminated `Running` session left behind by a
    /// crash, write a synthetic `SESSION_END`, and mark it `Failed`.
    /// Returns `true` if recovery ran.
    async fn recover_crash(&self) -> SupervisorResult<bool> {
        let sessions = SessionStore::new(&self.db);
        let Some(unterminated) = sessions.find_unterminated().await? else {
            return Ok(false);
        };

        tracing::warn!(session = %unterminated.id, "recovering from an unterminated session");
        self.events
            .append(Event::new(
                unterminated.id,
                EventType::SessionEnd,
                serde_json::json!({ "type": "crash" }),
            ))
            .await?;
        sessions
            .end(unterminated.id, SessionStatus::Failed, chrono::Utc::now(), Some("crash recovery".to_string()))
            .await?;
        Ok(true)
    }

    async fn run_one_session(
        &self,
        session_id: SessionId,
        resume: Option<PausedSession>,
    ) -> SupervisorResult<(SessionOutcome, SettleResult)> {
        let sessions = SessionStore::new(&self.db);
        let checkpoints = CheckpointManager::new(self.repo_path(), CheckpointStore::new(&self.db));
        let features = FeatureRegistry::new(FeatureStore::new(&self.db));

        // INIT
        sessions.start(session_id, chrono::Utc::now()).await?;
        self.events.append(Event::new(session_id, EventType::SessionStart, serde_json::json!({}))).await?;
        let feature_snapshot = serde_json::to_value(features.list().await?)
            .map_err(|e| SupervisorError::Runtime(e.to_string()))?;
        checkpoints
            .checkpoint(session_id, CheckpointTrigger::SessionStart, 1, feature_snapshot, None, None)
            .await?;

        // PREP
        let memory_store = MemoryStore::new(&self.db);
        let memory = MemoryManager::new(MemoryStore::new(&self.db));
        memory.rebuild_index().await?;
        let hypotheses = HypothesisStore::new(&self.db);
        let autonomy_store = arcadia_storage::AutonomyStore::new(&self.db);
        let autonomy_level = autonomy_store.metrics(session_id).await?.current_level;

        let previous_session = if session_id.get() > 1 {
            Some(SessionId::new(session_id.get() - 1))
        } else {
            None
        };

        let mut user_prompt = prompt::compose(
            &self.system_role_prompt,
            &memory_store,
            &features,
            &hypotheses,
            autonomy_level,
            previous_session,
            resume.as_ref(),
        )
        .await?;

        let mut record = RunRecord {
            current_feature: resume.as_ref().and_then(|p| p.current_feature),
            ..RunRecord::default()
        };

        // RUN
        let budget = BudgetTracker::new(self.budget_config.clone());
        let mut watchdog = Watchdog::new(self.watchdog_config.clone());
        let outcome = loop {
            let turn = tokio::select! {
                biased;
                reason = pause_requested() => {
                    break SessionOutcome::Paused { reason, notes: None };
                }
                turn = self.runtime.run_turn(&self.system_role_prompt, &self.tool_catalog, &user_prompt) => {
                    match turn {
                        Ok(turn) => turn,
                        Err(e) => return Err(SupervisorError::Runtime(e.to_string())),
                    }
                }
            };

            budget.record_usage(&turn.usage);

            let mut saw_tool_call = false;
            let mut next_prompt_parts = Vec::new();

            for event in turn.events {
                match event {
                    RuntimeEvent::Message { text } => {
                        memory.record_hot(session_id, text.clone()).await?;
                        next_prompt_parts.push(format!("(assistant said: {text})"));
                    },
                    RuntimeEvent::ToolCall { name, input } => {
                        saw_tool_call = true;
                        watchdog.record_tool_call();

                        let invocation = classify_invocation(&name, &input);
                        let mut ctx =
                            ToolCallContext::new(session_id, name.clone(), invocation).with_raw_input(input.clone());
                        if let Some(feature_index) = record.current_feature {
                            ctx = ctx.with_feature(feature_index);
                        }

                        let pipeline = self.build_pipeline().await?;
                        match pipeline.run_tool_call(ctx).await {
                            Ok(result) => {
                                memory.record_hot(session_id, result.output.clone()).await?;
                                next_prompt_parts.push(format!("(tool {name} result: {})", result.output));
                                if let Some(completed) = result.feature_completed {
                                    record.feature_completed_this_session = true;
                                    record.current_feature = features
                                        .next_by_salience(&[completed], chrono::Utc::now(), false)
                                        .await?
                                        .map(|f| f.index);
                                }
                            },
                            Err(e) => {
                                let message = e.to_string();
                                record.tool_errors.push(message.clone());
                                next_prompt_parts.push(format!("(tool {name} failed: {message})"));
                                watchdog.record_failure(FailureSample {
                                    feature_id: record.current_feature,
                                    error_hash: hash_error_text(&message),
                                });
                            },
                        }
                    },
                }
            }

            if let Some(flag) = watchdog.check(&budget) {
                break SessionOutcome::Watchdog(flag);
            }

            if !saw_tool_call {
                break SessionOutcome::Completed;
            }

            user_prompt = next_prompt_parts.join("\n");
        };

        // SETTLE
        let settle = self.settle(session_id, &memory, &checkpoints, &record, &outcome).await?;

        // END
        let status = match &outcome {
            SessionOutcome::Completed if record.feature_completed_this_session => SessionStatus::Success,
            SessionOutcome::Completed => SessionStatus::NoProgress,
            SessionOutcome::Watchdog(WatchdogFlag::Cyclic { .. }) => SessionStatus::Cyclic,
            SessionOutcome::Watchdog(WatchdogFlag::Stall) => SessionStatus::NoProgress,
            SessionOutcome::Watchdog(WatchdogFlag::BudgetExceeded) => SessionStatus::BudgetExceeded,
            SessionOutcome::Paused { .. } => SessionStatus::Paused,
        };
        sessions.end(session_id, status, chrono::Utc::now(), Some(self.summary_text(&record, &outcome))).await?;

        if let SessionOutcome::Paused { reason, notes } = &outcome {
            PausedSession {
                session_id,
                current_feature: record.current_feature,
                last_checkpoint_id: settle.last_checkpoint_id,
                resume_prompt: user_prompt,
                pause_reason: reason.clone(),
                human_notes: notes.clone(),
            }
            .save(&self.project.paused_session_path())?;
        } else {
            PausedSession::remove(&self.project.paused_session_path())?;
        }

        Ok((outcome, settle))
    }

    async fn build_pipeline(&self) -> SupervisorResult<HookPipeline<'_>> {
        let risk_patterns = RiskPatternStore::new(&self.db).list().await?;
        Ok(HookPipeline::new(
            self.security.clone(),
            self.risk_classifier.clone(),
            risk_patterns,
            AutonomyGate::new(self.autonomy_config.clone()),
            arcadia_storage::AutonomyStore::new(&self.db),
            CheckpointManager::new(self.repo_path(), CheckpointStore::new(&self.db)),
            Arc::clone(&self.events),
            Arc::clone(&self.executor),
            Arc::clone(&self.approval),
        ))
    }

    async fn settle(
        &self,
        session_id: SessionId,
        memory: &MemoryManager<'_>,
        checkpoints: &CheckpointManager<'_>,
        record: &RunRecord,
        outcome: &SessionOutcome,
    ) -> SupervisorResult<SettleResult> {
        let mut summary = WarmSummary::default();
        if record.feature_completed_this_session {
            summary.accomplished.push("completed at least one feature".to_string());
        }
        summary.issues_found = record.tool_errors.clone();

        memory.promote_session_end(session_id, summary).await?;

        if let SessionOutcome::Watchdog(flag) = outcome {
            self.file_failure_report(session_id, record, flag).await?;
        }

        let feature_snapshot = serde_json::to_value(
            FeatureRegistry::new(FeatureStore::new(&self.db)).list().await?,
        )
        .map_err(|e| SupervisorError::Runtime(e.to_string()))?;
        let checkpoint = checkpoints
            .checkpoint(session_id, CheckpointTrigger::SessionEnd, 1, feature_snapshot, None, None)
            .await?;

        Ok(SettleResult { last_checkpoint_id: Some(checkpoint.id), current_feature: record.current_feature })
    }

    /// Hand a watchdog-flagged session to the Failure Analyzer and
    /// persist the report it produces.
    async fn file_failure_report(
        &self,
        session_id: SessionId,
        _record: &RunRecord,
        flag: &WatchdogFlag,
    ) -> SupervisorResult<()> {
        let hint = match *flag {
            WatchdogFlag::Stall => FailureHint::Stall,
            WatchdogFlag::Cyclic { feature_id, count, .. } => FailureHint::Cyclic { feature_id, count },
            WatchdogFlag::BudgetExceeded => FailureHint::BudgetExceeded,
        };
        FailureAnalyzer::new(self.events.as_ref(), &self.db)
            .analyze(session_id, &hint)
            .await
            .map_err(|e| SupervisorError::Runtime(e.to_string()))?;
        Ok(())
    }

    fn summary_text(&self, record: &RunRecord, outcome: &SessionOutcome) -> String {
        match outcome {
            SessionOutcome::Completed if record.feature_completed_this_session => {
                "completed at least one feature".to_string()
            },
            SessionOutcome::Completed => "made no feature progress".to_string(),
            SessionOutcome::Watchdog(flag) => format!("stopped by watchdog: {flag:?}"),
            SessionOutcome::Paused { reason, .. } => format!("paused: {reason}"),
        }
    }
}

#[cfg(unix)]
async fn pause_requested() -> String {
    use tokio::signal::unix::{signal, SignalKind};
    let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    tokio::select! {
        _ = tokio::signal::ctrl_c() => "SIGINT".to_string(),
        _ = term.recv() => "SIGTERM".to_string(),
    }
}

#[cfg(not(unix))]
async fn pause_requested() -> String {
    tokio::signal::ctrl_c().await.ok();
    "ctrl-c".to_string()
}
