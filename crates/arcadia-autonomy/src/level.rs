//! Required-level derivation: the per-tool override table plus the
//! default rule ladder (§4.5).

use arcadia_risk::{RiskAssessment, ToolInvocation};
use arcadia_storage::models::AutonomyLevel;
use std::collections::HashMap;

/// Per-tool-name overrides of the level a tool requires, consulted
/// before the default derivation. Lets an operator pin a specific tool
/// (e.g. a destructive MCP integration) to a level stricter or looser
/// than its risk assessment alone would imply.
#[derive(Debug, Clone, Default)]
pub struct LevelOverrides(HashMap<String, AutonomyLevel>);

impl LevelOverrides {
    /// An empty override table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `tool_name` to `level`, replacing any prior override.
    pub fn insert(&mut self, tool_name: impl Into<String>, level: AutonomyLevel) -> &mut Self {
        self.0.insert(tool_name.into(), level);
        self
    }

    /// The override for `tool_name`, if any.
    #[must_use]
    pub fn get(&self, tool_name: &str) -> Option<AutonomyLevel> {
        self.0.get(tool_name).copied()
    }
}

/// The autonomy level a tool invocation requires: the configured
/// override if one exists, else the default ladder derived from its
/// risk assessment.
///
/// Default ladder, most permissive first: read-only requires `OBSERVE`;
/// a write requires at least `EXECUTE_SAFE`; an action with
/// `external_side_effects` requires at least `EXECUTE_REVIEW`; an
/// irreversible action at `risk_level >= 4` requires `FULL_AUTO`.
#[must_use]
pub fn required_level(
    tool_name: &str,
    invocation: &ToolInvocation,
    assessment: &RiskAssessment,
    overrides: &LevelOverrides,
) -> AutonomyLevel {
    if let Some(level) = overrides.get(tool_name) {
        return level;
    }
    default_required_level(invocation, assessment)
}

fn default_required_level(invocation: &ToolInvocation, assessment: &RiskAssessment) -> AutonomyLevel {
    if assessment.risk_level >= 4 && !assessment.reversible {
        return AutonomyLevel::FullAuto;
    }
    if assessment.external_side_effects {
        return AutonomyLevel::ExecuteReview;
    }
    if invocation.is_write() {
        return AutonomyLevel::ExecuteSafe;
    }
    AutonomyLevel::Observe
}
