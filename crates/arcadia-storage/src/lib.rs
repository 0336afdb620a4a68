//! Arcadia Storage — the State Store (§4.1).
//!
//! One embedded `SurrealDB` connection per project backs one repository
//! per data-model entity in §3: features, sessions, checkpoints,
//! artifacts, decisions, hypotheses, tiered memory rows, injection
//! points, interventions, autonomy metrics/decisions, risk patterns, and
//! failure reports.
//!
//! # Connection
//!
//! ```rust,ignore
//! use arcadia_storage::Database;
//!
//! let db = Database::connect_embedded(".arcadia/project.db").await?;
//! // or, for tests:
//! let db = Database::connect_memory().await?;
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod artifacts;
pub mod autonomy;
pub mod checkpoints;
pub mod db;
pub mod decisions;
pub mod error;
pub mod escalation;
pub mod failure_reports;
pub mod features;
pub mod hypotheses;
pub mod injections;
pub mod interventions;
pub mod memory;
pub mod models;
pub mod risk;
pub mod sessions;

pub use artifacts::ArtifactStore;
pub use autonomy::AutonomyStore;
pub use checkpoints::CheckpointStore;
pub use db::Database;
pub use decisions::DecisionStore;
pub use error::{StorageError, StorageResult};
pub use escalation::EscalationRuleStore;
pub use failure_reports::FailureReportStore;
pub use features::{FeatureStore, salience};
pub use hypotheses::HypothesisStore;
pub use injections::InjectionStore;
pub use interventions::InterventionStore;
pub use memory::MemoryStore;
pub use risk::RiskPatternStore;
pub use sessions::SessionStore;
