//! Arcadia Supervisor — the Session Supervisor (§4.11).
//!
//! Drives a project through the bounded `INIT -> RESUMING? -> PREP ->
//! RUN -> SETTLE -> END` session loop: creates and ends Session rows,
//! composes each turn's prompt from Tiered Memory and the Feature
//! Registry, routes every tool call through the Hook Pipeline, watches
//! for stall/cyclic/budget conditions during `RUN`, and persists a
//! resumable snapshot on pause or crash.
//!
//! # Example
//!
//! ```rust,no_run
//! use arcadia_supervisor::Supervisor;
//! use arcadia_autonomy::AutonomyConfig;
//! use arcadia_budget::BudgetConfig;
//! use arcadia_core::ProjectHome;
//! use arcadia_security::SecurityPolicy;
//! use arcadia_risk::RiskClassifier;
//! use arcadia_supervisor::WatchdogConfig;
//! use arcadia_events::EventLog;
//! use arcadia_storage::Database;
//! use std::sync::Arc;
//!
//! # struct StubRuntime;
//! # #[async_trait::async_trait]
//! # impl arcadia_core::AgentRuntime for StubRuntime {
//! #     type Error = std::io::Error;
//! #     async fn run_turn(&self, _: &str, _: &[arcadia_core::ToolCatalogEntry], _: &str)
//! #         -> Result<arcadia_core::RuntimeTurn, Self::Error> {
//! #         unimplemented!()
//! #     }
//! # }
//! # struct StubExecutor;
//! # #[async_trait::async_trait]
//! # impl arcadia_hooks::ToolExecutor for StubExecutor {
//! #     async fn execute(&self, _: &arcadia_hooks::ToolCallContext)
//! #         -> Result<arcadia_hooks::ToolOutcome, arcadia_hooks::ToolFailure> {
//! #         unimplemented!()
//! #     }
//! # }
//! # struct StubApproval;
//! # #[async_trait::async_trait]
//! # impl arcadia_hooks::ApprovalGateway for StubApproval {
//! #     async fn request_approval(&self, _: &arcadia_hooks::ToolCallContext, _: &arcadia_risk::RiskAssessment)
//! #         -> arcadia_hooks::ApprovalOutcome {
//! #         unimplemented!()
//! #     }
//! #     async fn record_outcome(&self, _: &arcadia_hooks::ToolCallContext, _: bool) {}
//! # }
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let project = ProjectHome::resolve_cwd()?;
//! let db = Database::connect_embedded(&project.project_db_path().to_string_lossy()).await?;
//! let events = Arc::new(EventLog::open(project.events_log_path()).await?);
//!
//! let supervisor = Supervisor::new(
//!     project,
//!     db,
//!     events,
//!     StubRuntime,
//!     Arc::new(StubExecutor),
//!     Arc::new(StubApproval),
//!     Vec::new(),
//!     SecurityPolicy::permissive(),
//!     RiskClassifier::new(),
//!     AutonomyConfig::default(),
//!     BudgetConfig::default(),
//!     WatchdogConfig::default(),
//!     "You are Arcadia, an autonomous coding agent.",
//! );
//! let _status = supervisor.run_to_completion().await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod invocation;
mod lock;
mod pause;
mod prompt;
mod state;
mod supervisor;
mod watchdog;

pub use error::{SupervisorError, SupervisorResult};
pub use invocation::classify_invocation;
pub use lock::SupervisorLock;
pub use pause::PausedSession;
pub use state::{SessionOutcome, SettleResult, SupervisorState, WatchdogFlag};
pub use supervisor::{ExitStatus, Supervisor};
pub use watchdog::{FailureSample, Watchdog, WatchdogConfig};
