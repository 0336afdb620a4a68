//! Intervention Learning (§4.10): turning repeated human answers into
//! an auto-applied pattern.
//!
//! A signature's pattern starts unconfident (`auto_apply: false`) the
//! moment a human first resolves an Injection Point for it. Each
//! subsequent gated call sharing that signature folds its eventual
//! success or failure into the pattern's confidence (an exponential
//! moving average); once enough samples have accumulated at a high
//! enough confidence, `auto_apply` flips on and [`crate::HumanGateway`]
//! short-circuits future calls with that signature straight to the
//! learned response.

use arcadia_storage::models::{InjectionPoint, Intervention, InterventionPattern};
use arcadia_storage::{InterventionStore, StorageResult};

/// Minimum observed outcomes before a pattern is trusted enough to
/// auto-apply.
const MIN_SAMPLES_FOR_AUTO: u32 = 3;
/// Confidence threshold (EWMA of success) above which a sufficiently
/// sampled pattern auto-applies.
const MIN_CONFIDENCE_FOR_AUTO: f64 = 0.8;
/// Weight given to the newest observation in the confidence EWMA.
const EWMA_WEIGHT: f64 = 0.3;

/// Record a human's response to a resolved Injection Point as an
/// Intervention, and seed (or refresh) the signature's learned
/// pattern.
///
/// # Errors
///
/// Returns an error if either store write fails.
pub async fn record_response(
    interventions: &InterventionStore<'_>,
    point: &InjectionPoint,
    signature: &str,
) -> StorageResult<()> {
    let response = point.response.clone().unwrap_or_default();

    let intervention = Intervention {
        id: arcadia_core::InterventionId::new(point.id.get()),
        injection_point_id: point.id,
        session_id: point.session_id,
        signature: signature.to_string(),
        human_response: response.clone(),
        timestamp: chrono::Utc::now(),
    };
    interventions.record(&intervention).await?;

    let pattern = match interventions.get_pattern(signature).await? {
        Some(mut existing) if existing.preferred_response == response => {
            existing.sample_count += 1;
            existing
        },
        // Either no pattern yet, or the human answered differently
        // than the pattern expected — reset rather than average across
        // contradictory guidance.
        _ => InterventionPattern {
            signature: signature.to_string(),
            preferred_response: response,
            confidence: 0.5,
            sample_count: 1,
            min_confidence_for_auto: MIN_CONFIDENCE_FOR_AUTO,
            auto_apply: false,
        },
    };
    interventions.put_pattern(&pattern).await?;
    Ok(())
}

/// Fold a gated call's eventual success or failure into its
/// signature's pattern, possibly flipping `auto_apply` on.
///
/// A no-op if no pattern has been seeded for this signature yet (i.e.
/// no human has ever resolved an Injection Point with it).
///
/// # Errors
///
/// Returns an error if the store write fails.
pub async fn record_outcome(
    interventions: &InterventionStore<'_>,
    signature: &str,
    succeeded: bool,
) -> StorageResult<()> {
    let Some(mut pattern) = interventions.get_pattern(signature).await? else {
        return Ok(());
    };
    let sample = if succeeded { 1.0 } else { 0.0 };
    pattern.confidence = pattern.confidence.mul_add(1.0 - EWMA_WEIGHT, sample * EWMA_WEIGHT);
    pattern.sample_count += 1;
    pattern.auto_apply = pattern.sample_count >= MIN_SAMPLES_FOR_AUTO
        && pattern.confidence >= pattern.min_confidence_for_auto;
    interventions.put_pattern(&pattern).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcadia_core::{InjectionPointId, SessionId};
    use arcadia_storage::models::{InjectionStatus, InjectionType};
    use arcadia_storage::Database;

    fn resolved_point(response: &str) -> InjectionPoint {
        InjectionPoint {
            id: InjectionPointId::new(1),
            session_id: SessionId::new(1),
            injection_type: InjectionType::Approval,
            created_at: chrono::Utc::now(),
            context: "about to force-push".into(),
            options: vec!["approve".into(), "deny".into()],
            recommendation: Some("deny".into()),
            timeout_s: 300,
            default_on_timeout: Some("deny".into()),
            status: InjectionStatus::Responded,
            response: Some(response.to_string()),
            responded_by: Some("alice".into()),
        }
    }

    #[tokio::test]
    async fn first_response_seeds_an_unconfident_pattern() {
        let db = Database::connect_memory().await.unwrap();
        let store = InterventionStore::new(&db);
        record_response(&store, &resolved_point("deny"), "sig-a").await.unwrap();

        let pattern = store.get_pattern("sig-a").await.unwrap().unwrap();
        assert_eq!(pattern.sample_count, 1);
        assert!(!pattern.auto_apply);
    }

    #[tokio::test]
    async fn repeated_successful_outcomes_flip_auto_apply() {
        let db = Database::connect_memory().await.unwrap();
        let store = InterventionStore::new(&db);
        record_response(&store, &resolved_point("deny"), "sig-b").await.unwrap();

        for _ in 0..3 {
            record_outcome(&store, "sig-b", true).await.unwrap();
        }

        let pattern = store.get_pattern("sig-b").await.unwrap().unwrap();
        assert!(pattern.auto_apply);
        assert_eq!(pattern.preferred_response, "deny");
    }

    #[tokio::test]
    async fn contradictory_response_resets_the_pattern() {
        let db = Database::connect_memory().await.unwrap();
        let store = InterventionStore::new(&db);
        record_response(&store, &resolved_point("deny"), "sig-c").await.unwrap();
        for _ in 0..3 {
            record_outcome(&store, "sig-c", true).await.unwrap();
        }
        assert!(store.get_pattern("sig-c").await.unwrap().unwrap().auto_apply);

        record_response(&store, &resolved_point("approve"), "sig-c").await.unwrap();
        let pattern = store.get_pattern("sig-c").await.unwrap().unwrap();
        assert_eq!(pattern.preferred_response, "approve");
        assert!(!pattern.auto_apply);
        assert_eq!(pattern.sample_count, 1);
    }

    #[tokio::test]
    async fn record_outcome_is_a_no_op_without_a_seeded_pattern() {
        let db = Database::connect_memory().await.unwrap();
        let store = InterventionStore::new(&db);
        record_outcome(&store, "never-seen", true).await.unwrap();
        assert!(store.get_pattern("never-seen").await.unwrap().is_none());
    }
}
