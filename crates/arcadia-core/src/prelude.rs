//! Prelude - commonly used types for convenient import.
//!
//! ```rust
//! use arcadia_core::prelude::*;
//! ```

pub use crate::{
    AgentRuntime, ArcadiaError, ArcadiaResult, ArtifactId, CheckpointId, DecisionId, EventId,
    EventType, FailureReportId, FeatureId, HypothesisId, InjectionPointId, InterventionId,
    InvocationId, ProjectHome, RuntimeEvent, RuntimeTurn, SessionId, TokenUsage, ToolCatalogEntry,
};
