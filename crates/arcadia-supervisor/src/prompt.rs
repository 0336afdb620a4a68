//! Composes the prompt handed to the agent runtime at `PREP` (§4.11):
//! the system role prompt, the most recent Warm summary, the
//! next-salience feature, any unresolved hypotheses from the prior
//! session, and a one-line autonomy snapshot.
//!
//! Grounded on `astrid-tools/src/lib.rs`'s `build_system_prompt`
//! (concatenating a fixed role preamble with live state sections),
//! adapted from a tool-catalog listing into the sections this system's
//! `PREP` phase actually needs.

use arcadia_core::SessionId;
use arcadia_features::FeatureRegistry;
use arcadia_storage::models::{AutonomyLevel, Feature, HypothesisStatus, MemoryTier};
use arcadia_storage::{HypothesisStore, MemoryStore};

use crate::error::SupervisorResult;
use crate::pause::PausedSession;

/// Build the prompt text for one `PREP` phase.
///
/// `previous_session` is the most recently ended session, if any (used
/// to pull forward its unresolved hypotheses); `resuming` carries a
/// paused-session snapshot when this is a resume rather than a fresh
/// start.
pub async fn compose(
    system_role_prompt: &str,
    memory: &MemoryStore<'_>,
    features: &FeatureRegistry<'_>,
    hypotheses: &HypothesisStore<'_>,
    autonomy_level: AutonomyLevel,
    previous_session: Option<SessionId>,
    resuming: Option<&PausedSession>,
) -> SupervisorResult<String> {
    let mut sections = vec![system_role_prompt.to_string()];

    if let Some(paused) = resuming {
        sections.push(format!(
            "## Resuming a paused session\n\n{}\n\nReason it paused: {}{}",
            paused.resume_prompt,
            paused.pause_reason,
            paused
                .human_notes
                .as_ref()
                .map(|n| format!("\nHuman notes: {n}"))
                .unwrap_or_default()
        ));
    }

    if let Some(summary) = most_recent_warm(memory).await? {
        sections.push(format!("## Last session summary\n\n{summary}"));
    }

    if let Some(feature) = features.next_by_salience(&[], chrono::Utc::now(), false).await? {
        sections.push(format!("## Next feature\n\n{}", describe_feature(&feature)));
    }

    if let Some(previous_session) = previous_session {
        let open = hypotheses.list_by_session(previous_session).await?;
        let open: Vec<_> = open.into_iter().filter(|h| h.status == HypothesisStatus::Open).collect();
        if !open.is_empty() {
            let lines: Vec<String> =
                open.iter().map(|h| format!("- {} (confidence {:.2})", h.statement, h.confidence)).collect();
            sections.push(format!("## Unresolved hypotheses from last session\n\n{}", lines.join("\n")));
        }
    }

    sections.push(format!("## Autonomy\n\nCurrent autonomy level: {autonomy_level:?}"));

    Ok(sections.join("\n\n"))
}

async fn most_recent_warm(memory: &MemoryStore<'_>) -> SupervisorResult<Option<String>> {
    let mut warm = memory.list_by_tier(MemoryTier::Warm).await?;
    warm.sort_by_key(|row| row.created_at);
    Ok(warm.pop().map(|row| row.content))
}

fn describe_feature(feature: &Feature) -> String {
    let mut text = format!("[{}] {} ({})", feature.index, feature.description, feature.category);
    if !feature.steps.is_empty() {
        let steps: Vec<String> = feature.steps.iter().map(|s| format!("  - {s}")).collect();
        text.push_str(&format!("\nSteps:\n{}", steps.join("\n")));
    }
    if feature.failure_count > 0 {
        text.push_str(&format!("\nPrior verified-failing attempts: {}", feature.failure_count));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcadia_storage::models::Priority;
    use arcadia_storage::{Database, FeatureStore};

    fn feature(index: i64) -> Feature {
        Feature {
            index,
            category: "auth".into(),
            description: "wire up login".into(),
            steps: vec!["add form".into(), "validate csrf".into()],
            passes: false,
            priority: Priority::P2,
            failure_count: 0,
            last_worked: None,
            blocked_by: Vec::new(),
            blocks: Vec::new(),
            verified_at: None,
            verification_artifacts: Vec::new(),
            blocked_reason: None,
            skip_verification: false,
        }
    }

    #[tokio::test]
    async fn composes_all_sections_when_everything_is_present() {
        let db = Database::connect_memory().await.unwrap();
        let memory = MemoryStore::new(&db);
        let feature_store = FeatureStore::new(&db);
        let registry = FeatureRegistry::new(feature_store);
        let hyps = HypothesisStore::new(&db);

        registry.create(&feature(1)).await.unwrap();

        let prompt =
            compose("You are Arcadia.", &memory, &registry, &hyps, AutonomyLevel::Observe, None, None)
                .await
                .unwrap();

        assert!(prompt.contains("You are Arcadia."));
        assert!(prompt.contains("wire up login"));
        assert!(prompt.contains("Autonomy"));
    }

    #[tokio::test]
    async fn resume_section_surfaces_when_a_snapshot_is_given() {
        let db = Database::connect_memory().await.unwrap();
        let memory = MemoryStore::new(&db);
        let registry = FeatureRegistry::new(FeatureStore::new(&db));
        let hyps = HypothesisStore::new(&db);

        let paused = PausedSession {
            session_id: SessionId::new(1),
            current_feature: Some(1),
            last_checkpoint_id: None,
            resume_prompt: "pick up the login form".into(),
            pause_reason: "human requested pause".into(),
            human_notes: None,
        };

        let prompt = compose(
            "You are Arcadia.",
            &memory,
            &registry,
            &hyps,
            AutonomyLevel::Observe,
            None,
            Some(&paused),
        )
        .await
        .unwrap();

        assert!(prompt.contains("Resuming a paused session"));
        assert!(prompt.contains("pick up the login form"));
    }
}
