//! Row types for every entity in the data model (§3).

use arcadia_core::{
    ArtifactId, CheckpointId, DecisionId, EventId, FailureReportId, FeatureId, HypothesisId,
    InjectionPointId, InterventionId, SessionId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Priority band of a Feature, 1 (highest) through 4 (lowest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Priority {
    /// Highest priority.
    P1 = 1,
    /// High priority.
    P2 = 2,
    /// Normal priority.
    P3 = 3,
    /// Low priority.
    P4 = 4,
}

impl Priority {
    /// The weight `priority_weight[p]` used in the salience formula.
    #[must_use]
    pub fn weight(self) -> f64 {
        match self {
            Self::P1 => 0.4,
            Self::P2 => 0.3,
            Self::P3 => 0.2,
            Self::P4 => 0.1,
        }
    }
}

/// A unit of work tracked against the application spec being built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    /// Stable index, also the feature's id.
    pub index: i64,
    /// Grouping category (e.g. "auth", "billing").
    pub category: String,
    /// Human-readable description.
    pub description: String,
    /// Ordered implementation steps.
    pub steps: Vec<String>,
    /// Whether this feature currently passes verification.
    pub passes: bool,
    /// Priority band, 1 (highest) to 4 (lowest).
    pub priority: Priority,
    /// Count of verified-failing attempts.
    pub failure_count: u32,
    /// Timestamp of the last session that touched this feature.
    pub last_worked: Option<DateTime<Utc>>,
    /// Features that must pass before this one can.
    pub blocked_by: Vec<i64>,
    /// Features this one unblocks once it passes.
    pub blocks: Vec<i64>,
    /// When this feature last passed verification.
    pub verified_at: Option<DateTime<Utc>>,
    /// Artifact ids backing the most recent `passes = true` claim.
    pub verification_artifacts: Vec<ArtifactId>,
    /// If `blocked_by` is non-empty, the reason recorded for the block.
    pub blocked_reason: Option<String>,
    /// Escape hatch for features with no producible evidence (satisfies
    /// invariant F1 without an artifact).
    pub skip_verification: bool,
}

impl Feature {
    /// Id view of [`Feature::index`].
    #[must_use]
    pub fn id(&self) -> FeatureId {
        FeatureId::new(self.index)
    }
}

/// Terminal or in-flight status of a Session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Currently executing.
    Running,
    /// Ended with at least one feature transitioning to `passes = true`.
    Success,
    /// Ended without making progress and without a recoverable cause.
    Failed,
    /// Ended awaiting human response to an Injection Point.
    Intervention,
    /// Ended because the watchdog detected a repeating tool-call cycle.
    Cyclic,
    /// Ended because no feature changed state across the session.
    NoProgress,
    /// Suspended by SIGTERM or an explicit pause request.
    Paused,
    /// Ended because the Budget tracker's cap was reached.
    BudgetExceeded,
}

/// One bounded run of the agent against the project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Session id.
    pub id: SessionId,
    /// When the session started.
    pub start_time: DateTime<Utc>,
    /// When the session ended, if it has.
    pub end_time: Option<DateTime<Utc>>,
    /// Current status.
    pub status: SessionStatus,
    /// Free-text summary written at SETTLE.
    pub summary: Option<String>,
}

/// Reason a Checkpoint was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckpointTrigger {
    /// A feature transitioned to `passes = true`.
    FeatureComplete,
    /// Immediately before a risk-classified operation requiring one.
    BeforeRiskyOp,
    /// Taken while recovering from a detected failure.
    ErrorRecovery,
    /// Requested explicitly via an Injection Point.
    HumanRequest,
    /// Taken at session start.
    SessionStart,
    /// Taken at session end.
    SessionEnd,
    /// Taken when the session is paused.
    Pause,
}

/// A durable recovery point: a VCS commit plus the State Store snapshot
/// that goes with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint id.
    pub id: CheckpointId,
    /// Owning session.
    pub session_id: SessionId,
    /// When the checkpoint was taken.
    pub timestamp: DateTime<Utc>,
    /// What triggered it.
    pub trigger: CheckpointTrigger,
    /// The VCS commit hash it corresponds to.
    pub vcs_commit_hash: String,
    /// Serialized `{feature_index: passes}` snapshot at checkpoint time.
    pub feature_status_snapshot: serde_json::Value,
    /// Free-text note on what remains to be done.
    pub pending_work: Option<String>,
    /// Free-text annotation.
    pub notes: Option<String>,
    /// Hot memory rows captured alongside an `ErrorRecovery` checkpoint.
    pub hot_memory_snapshot: Option<serde_json::Value>,
}

/// Kind of evidence an Artifact represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactType {
    /// A captured screenshot.
    Screenshot,
    /// A file written by the agent.
    FileWrite,
    /// A reference to a VCS commit.
    CommitRef,
    /// The result of a test run.
    TestResult,
}

/// Evidence backing a `passes = true` claim or a tool side effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    /// Artifact id.
    pub id: ArtifactId,
    /// Owning session.
    pub session_id: SessionId,
    /// Artifact kind.
    pub artifact_type: ArtifactType,
    /// Path relative to the project root.
    pub path_relative: String,
    /// SHA-256 checksum of the artifact's contents.
    pub sha256_checksum: String,
    /// Free-form structured metadata (dimensions, exit code, ...).
    pub metadata: serde_json::Value,
}

/// A gated or autonomous choice made during a session, outside the
/// Autonomy Manager's own per-tool gate decisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    /// Decision id.
    pub id: DecisionId,
    /// Owning session.
    pub session_id: SessionId,
    /// When the decision was made.
    pub timestamp: DateTime<Utc>,
    /// What was decided.
    pub summary: String,
    /// Why.
    pub rationale: Option<String>,
    /// The feature this decision relates to, if any.
    pub related_feature: Option<i64>,
}

/// Status of a Hypothesis under investigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HypothesisStatus {
    /// Still being investigated.
    Open,
    /// Evidence supported it.
    Confirmed,
    /// Evidence contradicted it.
    Refuted,
}

/// A candidate explanation the agent is testing (e.g. "the build fails
/// because of a stale lockfile").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hypothesis {
    /// Hypothesis id.
    pub id: HypothesisId,
    /// Owning session.
    pub session_id: SessionId,
    /// When it was recorded.
    pub timestamp: DateTime<Utc>,
    /// The statement under test.
    pub statement: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Current status.
    pub status: HypothesisStatus,
    /// Supporting or refuting evidence gathered so far.
    pub evidence: Vec<String>,
}

/// Which tier of Tiered Memory a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryTier {
    /// In-session working context.
    Hot,
    /// Cross-session context retained for recent sessions.
    Warm,
    /// Long-term, keyword-indexed knowledge.
    Cold,
}

/// A single memory row in one of the three tiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRow {
    /// Row id (surrogate, distinct from the typed ids above).
    pub id: String,
    /// Tier this row currently lives in.
    pub tier: MemoryTier,
    /// Owning session (the session that produced the row).
    pub session_id: SessionId,
    /// When the row was written.
    pub created_at: DateTime<Utc>,
    /// The row's content.
    pub content: String,
    /// Keyword index terms, populated for `Cold` rows.
    pub keywords: Vec<String>,
    /// Set on a `Warm` row once it has been folded into a `Cold` summary.
    pub summarized: bool,
}

/// Kind of Injection Point (§3, §4.10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionType {
    /// A plain decision between options.
    Decision,
    /// A destructive or high-risk action awaiting approval.
    Approval,
    /// A request for open-ended guidance.
    Guidance,
    /// A request to review agent-produced output.
    Review,
    /// A request to redirect the agent's current plan.
    Redirect,
}

/// Lifecycle state of an Injection Point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionStatus {
    /// Awaiting a human response.
    Pending,
    /// A human responded.
    Responded,
    /// The timeout elapsed; the default was applied.
    Timeout,
    /// Cancelled before it was resolved.
    Cancelled,
}

/// A point where the Session Supervisor paused to ask a human something.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjectionPoint {
    /// Injection Point id.
    pub id: InjectionPointId,
    /// Owning session.
    pub session_id: SessionId,
    /// Kind of injection.
    pub injection_type: InjectionType,
    /// When it was opened.
    pub created_at: DateTime<Utc>,
    /// Context shown to the human.
    pub context: String,
    /// Offered options, if any.
    pub options: Vec<String>,
    /// The agent's own recommendation, if it has one.
    pub recommendation: Option<String>,
    /// Seconds to wait before applying the default.
    pub timeout_s: u64,
    /// Option applied automatically on timeout.
    pub default_on_timeout: Option<String>,
    /// Current lifecycle state.
    pub status: InjectionStatus,
    /// The chosen response, once resolved.
    pub response: Option<String>,
    /// Who resolved it: a human identifier, or "timeout"/"auto_applied".
    pub responded_by: Option<String>,
}

/// A recorded human response to an Injection Point, kept so future
/// matching prompts can auto-apply it (§4.10).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intervention {
    /// Intervention id.
    pub id: InterventionId,
    /// The Injection Point this intervention resolved.
    pub injection_point_id: InjectionPointId,
    /// Owning session.
    pub session_id: SessionId,
    /// Fingerprint of the prompt shape (see `arcadia-human`'s signature
    /// hashing).
    pub signature: String,
    /// The human's response.
    pub human_response: String,
    /// When it was recorded.
    pub timestamp: DateTime<Utc>,
}

/// A learned auto-apply rule distilled from repeated [`Intervention`]s
/// sharing a signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterventionPattern {
    /// Pattern id, keyed by signature.
    pub signature: String,
    /// Response to apply automatically once confident enough.
    pub preferred_response: String,
    /// Running confidence in `[0, 1]`.
    pub confidence: f64,
    /// Number of matching interventions observed.
    pub sample_count: u32,
    /// Confidence threshold above which this pattern auto-applies.
    pub min_confidence_for_auto: f64,
    /// Whether this pattern is currently eligible for auto-apply.
    pub auto_apply: bool,
}

/// The five autonomy rungs (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum AutonomyLevel {
    /// Read-only observation.
    Observe = 1,
    /// May plan but not execute.
    Plan = 2,
    /// May execute actions classified as safe.
    ExecuteSafe = 3,
    /// May execute any action subject to post-hoc review.
    ExecuteReview = 4,
    /// Full autonomy, no gate.
    FullAuto = 5,
}

/// Persisted autonomy-leveling state for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutonomyMetrics {
    /// Owning session.
    pub session_id: SessionId,
    /// Current level.
    pub current_level: AutonomyLevel,
    /// Consecutive successful gated actions at the current level.
    pub consecutive_successes: u32,
    /// Consecutive errored gated actions at the current level.
    pub consecutive_errors: u32,
}

/// A single promote/demote/gate decision made by the Autonomy Manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutonomyDecision {
    /// Decision id.
    pub id: DecisionId,
    /// Owning session.
    pub session_id: SessionId,
    /// When the decision was made.
    pub timestamp: DateTime<Utc>,
    /// Tool the decision concerned.
    pub tool_name: String,
    /// Level the tool required.
    pub level_required: AutonomyLevel,
    /// The session's level at decision time.
    pub level_current: AutonomyLevel,
    /// Whether the invocation was allowed to proceed.
    pub allowed: bool,
    /// Human-readable reason.
    pub reason: String,
}

/// A known risky command/tool-input shape (§4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskPattern {
    /// Pattern id.
    pub id: String,
    /// Glob or prefix matched against a tool invocation's rendered form.
    pub pattern: String,
    /// Risk level 1 (lowest) through 5 (highest).
    pub risk_level: u8,
    /// Whether the action can be undone.
    pub reversible: bool,
    /// Whether the action mutates the project's source of truth (VCS,
    /// deployed infra).
    pub affects_source_of_truth: bool,
    /// Whether the action has side effects outside the project sandbox.
    pub external_side_effects: bool,
    /// Whether this pattern forces a human approval gate.
    pub requires_approval: bool,
    /// Whether this pattern forces a checkpoint before execution.
    pub requires_checkpoint: bool,
    /// Whether this pattern forces a post-hoc review.
    pub requires_review: bool,
    /// Suggested safer alternative, shown to the human if escalated.
    pub mitigation: Option<String>,
}

/// Failure category assigned by the Failure Analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// A repeating tool-call cycle was detected.
    CyclicError,
    /// The agent repeatedly attempted a command the Security Gate blocks.
    BlockedCommands,
    /// A tool invocation exceeded its deadline.
    Timeout,
    /// The supervisor process crashed mid-session.
    Crash,
    /// A previously passing feature stopped passing.
    Regression,
    /// No failure; included so a report can assert a clean bill of
    /// health.
    Ok,
}

/// Structured output of the Failure Analyzer (§4.14), persisted so
/// future sessions can recognize a recurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureReport {
    /// Report id.
    pub id: FailureReportId,
    /// Owning session.
    pub session_id: SessionId,
    /// Assigned category.
    pub category: FailureCategory,
    /// The last action known to have succeeded.
    pub last_successful_action: Option<String>,
    /// The action that failed.
    pub failing_action: Option<String>,
    /// Raw error text gathered from the Event Log.
    pub error_messages: Vec<String>,
    /// The analyzer's best guess at root cause.
    pub likely_cause: Option<String>,
    /// Confidence in `likely_cause`, in `[0, 1]`.
    pub confidence: f64,
    /// Ids of prior [`FailureReport`]s judged similar.
    pub similar_past_failures: Vec<FailureReportId>,
    /// Suggested next steps.
    pub suggested_fixes: Vec<String>,
}

/// A declarative rule evaluated after each `TOOL_RESULT` (and at
/// decision points) that opens an Injection Point when its condition
/// matches. The four built-in rules are seeded under fixed ids; custom
/// rules are persisted alongside them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationRule {
    /// Rule id. Built-ins use `"builtin:<name>"`.
    pub id: String,
    /// Human-readable description of what triggers this rule.
    pub condition: String,
    /// 1 (lowest) through 5 (highest).
    pub severity: u8,
    /// Kind of Injection Point this rule opens.
    pub injection_type: InjectionType,
    /// Template rendered into the Injection Point's context, with
    /// `{tool}`/`{feature}`/`{reason}` placeholders filled by the
    /// evaluator.
    pub message_template: String,
    /// Options offered alongside the default accept/deny pair.
    pub suggested_actions: Vec<String>,
    /// Whether a match should also pause the session outright.
    pub auto_pause: bool,
    /// Seconds to wait before applying the Injection Point's default.
    pub timeout_s: u32,
}

/// An Event Log row, as seen through the State Store (the log's durable
/// form lives in `arcadia-events`; this view exists for repositories
/// that need to join against it, e.g. the Failure Analyzer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRow {
    /// Event id.
    pub event_id: EventId,
    /// Owning session.
    pub session_id: SessionId,
    /// When it was appended.
    pub timestamp: DateTime<Utc>,
    /// Event type tag.
    pub event_type: String,
    /// Structured payload.
    pub payload: serde_json::Value,
}
