//! Feature/memory/decision/hypothesis/intervention query-and-record
//! tools: thin wrappers over the State Store repositories rather than
//! [`crate::BuiltinTool`] implementations, since they need a
//! [`Database`] handle that [`crate::ToolContext`] deliberately
//! doesn't carry (file/shell tools never touch the state layer).
//!
//! Dispatched by name from [`crate::executor::ArcadiaToolExecutor`].

use crate::{ToolError, ToolResult};
use arcadia_core::{DecisionId, HypothesisId, InterventionId, SessionId};
use arcadia_features::FeatureRegistry;
use arcadia_storage::models::{Decision, Hypothesis, HypothesisStatus, Intervention};
use arcadia_storage::{Database, DecisionStore, FeatureStore, HypothesisStore, InterventionStore, MemoryStore};
use chrono::Utc;
use serde_json::Value;

fn require_str<'a>(args: &'a Value, field: &str) -> Result<&'a str, ToolError> {
    args.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::InvalidArguments(format!("{field} is required")))
}

fn require_i64(args: &Value, field: &str) -> Result<i64, ToolError> {
    args.get(field)
        .and_then(Value::as_i64)
        .ok_or_else(|| ToolError::InvalidArguments(format!("{field} is required")))
}

/// `feature_next`: the highest-salience unblocked feature.
pub async fn feature_next(db: &Database, args: &Value) -> ToolResult {
    let registry = FeatureRegistry::new(FeatureStore::new(db));
    let skip_blocked = args.get("skip_blocked").and_then(Value::as_bool).unwrap_or(false);
    let related = match args.get("focus_index").and_then(Value::as_i64) {
        Some(focus) => registry.related_features(focus).await?,
        None => Vec::new(),
    };
    match registry.next_by_salience(&related, Utc::now(), skip_blocked).await? {
        Some(feature) => Ok(serde_json::to_string_pretty(&feature).unwrap_or_default()),
        None => Ok("(no eligible feature)".to_string()),
    }
}

/// `feature_show`: fetch one feature by index.
pub async fn feature_show(db: &Database, args: &Value) -> ToolResult {
    let index = require_i64(args, "index")?;
    let feature = FeatureStore::new(db).get(index).await?;
    Ok(serde_json::to_string_pretty(&feature).unwrap_or_default())
}

/// `feature_list`: every feature row.
pub async fn feature_list(db: &Database, _args: &Value) -> ToolResult {
    let features = FeatureStore::new(db).list().await?;
    Ok(serde_json::to_string_pretty(&features).unwrap_or_default())
}

/// `feature_search`: features whose category or description contains
/// `query` (case-insensitive substring match).
pub async fn feature_search(db: &Database, args: &Value) -> ToolResult {
    let query = require_str(args, "query")?.to_lowercase();
    let matches: Vec<_> = FeatureStore::new(db)
        .list()
        .await?
        .into_iter()
        .filter(|f| {
            f.category.to_lowercase().contains(&query) || f.description.to_lowercase().contains(&query)
        })
        .collect();
    Ok(serde_json::to_string_pretty(&matches).unwrap_or_default())
}

/// `feature_mark_passing`: mark a feature as passing with evidence
/// already recorded as artifacts.
pub async fn feature_mark_passing(db: &Database, args: &Value) -> ToolResult {
    let index = require_i64(args, "index")?;
    let artifacts = args
        .get("artifact_ids")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(Value::as_i64).map(arcadia_core::ArtifactId::new).collect())
        .unwrap_or_default();
    let registry = FeatureRegistry::new(FeatureStore::new(db));
    let feature = registry.mark_passing(index, artifacts, Utc::now()).await?;
    Ok(serde_json::to_string_pretty(&feature).unwrap_or_default())
}

/// `feature_add_blocked`: add a `blocked_by` dependency edge.
pub async fn feature_add_blocked(db: &Database, args: &Value) -> ToolResult {
    let from = require_i64(args, "from")?;
    let to = require_i64(args, "to")?;
    FeatureRegistry::new(FeatureStore::new(db)).add_blocked_by(from, to).await?;
    Ok(format!("{from} now blocked by {to}"))
}

/// `feature_unblock`: remove a `blocked_by` dependency edge.
pub async fn feature_unblock(db: &Database, args: &Value) -> ToolResult {
    let from = require_i64(args, "from")?;
    let to = require_i64(args, "to")?;
    FeatureRegistry::new(FeatureStore::new(db)).unblock(from, to).await?;
    Ok(format!("{from} no longer blocked by {to}"))
}

/// `memory_search`: cold-tier substring search.
pub async fn memory_search(db: &Database, args: &Value) -> ToolResult {
    let keyword = require_str(args, "keyword")?;
    let rows = MemoryStore::new(db).search_cold(keyword).await?;
    Ok(serde_json::to_string_pretty(&rows).unwrap_or_default())
}

/// `memory_hot`: every hot-tier row for a session.
pub async fn memory_hot(db: &Database, args: &Value) -> ToolResult {
    let session_id = SessionId::new(require_i64(args, "session_id")?);
    let rows = MemoryStore::new(db).hot_for_session(session_id).await?;
    Ok(serde_json::to_string_pretty(&rows).unwrap_or_default())
}

/// `decision_record`: log a gated or autonomous choice.
pub async fn decision_record(db: &Database, args: &Value) -> ToolResult {
    let session_id = SessionId::new(require_i64(args, "session_id")?);
    let summary = require_str(args, "summary")?.to_string();
    let rationale = args.get("rationale").and_then(Value::as_str).map(str::to_string);
    let related_feature = args.get("related_feature").and_then(Value::as_i64);

    let store = DecisionStore::new(db);
    let next_id = DecisionId::new(store.list_by_session(session_id).await?.len() as i64 + 1);
    let decision = Decision {
        id: next_id,
        session_id,
        timestamp: Utc::now(),
        summary,
        rationale,
        related_feature,
    };
    let created = store.create(&decision).await?;
    Ok(serde_json::to_string_pretty(&created).unwrap_or_default())
}

/// `decision_list`: every decision logged during a session.
pub async fn decision_list(db: &Database, args: &Value) -> ToolResult {
    let session_id = SessionId::new(require_i64(args, "session_id")?);
    let rows = DecisionStore::new(db).list_by_session(session_id).await?;
    Ok(serde_json::to_string_pretty(&rows).unwrap_or_default())
}

/// `hypothesis_record`: log a new working hypothesis.
pub async fn hypothesis_record(db: &Database, args: &Value) -> ToolResult {
    let session_id = SessionId::new(require_i64(args, "session_id")?);
    let statement = require_str(args, "statement")?.to_string();
    let confidence = args.get("confidence").and_then(Value::as_f64).unwrap_or(0.5);

    let store = HypothesisStore::new(db);
    let next_id = HypothesisId::new(store.list_by_session(session_id).await?.len() as i64 + 1);
    let hypothesis = Hypothesis {
        id: next_id,
        session_id,
        timestamp: Utc::now(),
        statement,
        confidence,
        status: HypothesisStatus::Open,
        evidence: Vec::new(),
    };
    let created = store.create(&hypothesis).await?;
    Ok(serde_json::to_string_pretty(&created).unwrap_or_default())
}

/// `hypothesis_resolve`: settle a hypothesis as confirmed or refuted.
pub async fn hypothesis_resolve(db: &Database, args: &Value) -> ToolResult {
    let id = HypothesisId::new(require_i64(args, "id")?);
    let confirmed = args.get("confirmed").and_then(Value::as_bool).unwrap_or(false);
    let evidence = require_str(args, "evidence")?.to_string();
    let status = if confirmed { HypothesisStatus::Confirmed } else { HypothesisStatus::Refuted };

    let updated = HypothesisStore::new(db).resolve(id, status, evidence).await?;
    Ok(serde_json::to_string_pretty(&updated).unwrap_or_default())
}

/// `hypothesis_list`: every hypothesis logged during a session.
pub async fn hypothesis_list(db: &Database, args: &Value) -> ToolResult {
    let session_id = SessionId::new(require_i64(args, "session_id")?);
    let rows = HypothesisStore::new(db).list_by_session(session_id).await?;
    Ok(serde_json::to_string_pretty(&rows).unwrap_or_default())
}

/// `intervention_record`: log a resolved human response to an
/// injection point.
pub async fn intervention_record(db: &Database, args: &Value) -> ToolResult {
    let injection_point_id = arcadia_core::InjectionPointId::new(require_i64(args, "injection_point_id")?);
    let session_id = SessionId::new(require_i64(args, "session_id")?);
    let signature = require_str(args, "signature")?.to_string();
    let human_response = require_str(args, "human_response")?.to_string();

    let store = InterventionStore::new(db);
    let next_id = InterventionId::new(store.list_by_signature(&signature).await?.len() as i64 + 1);
    let intervention = Intervention {
        id: next_id,
        injection_point_id,
        session_id,
        signature,
        human_response,
        timestamp: Utc::now(),
    };
    let created = store.record(&intervention).await?;
    Ok(serde_json::to_string_pretty(&created).unwrap_or_default())
}

/// `intervention_list`: past interventions sharing a signature, plus
/// the learned pattern if one exists.
pub async fn intervention_list(db: &Database, args: &Value) -> ToolResult {
    let signature = require_str(args, "signature")?;
    let store = InterventionStore::new(db);
    let interventions = store.list_by_signature(signature).await?;
    let pattern = store.get_pattern(signature).await?;
    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "interventions": interventions,
        "pattern": pattern,
    }))
    .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcadia_storage::models::{Feature, Priority};

    async fn seeded_db() -> Database {
        Database::connect_memory().await.unwrap()
    }

    fn feature(index: i64) -> Feature {
        Feature {
            index,
            category: "auth".into(),
            description: "login form".into(),
            steps: vec![],
            passes: false,
            priority: Priority::P2,
            failure_count: 0,
            last_worked: None,
            blocked_by: vec![],
            blocks: vec![],
            verified_at: None,
            verification_artifacts: vec![],
            blocked_reason: None,
            skip_verification: false,
        }
    }

    #[tokio::test]
    async fn feature_next_returns_highest_salience_feature() {
        let db = seeded_db().await;
        FeatureStore::new(&db).create(&feature(1)).await.unwrap();
        let result = feature_next(&db, &serde_json::json!({})).await.unwrap();
        assert!(result.contains("\"index\": 1"));
    }

    #[tokio::test]
    async fn feature_search_matches_description() {
        let db = seeded_db().await;
        FeatureStore::new(&db).create(&feature(1)).await.unwrap();
        let result = feature_search(&db, &serde_json::json!({"query": "login"})).await.unwrap();
        assert!(result.contains("login form"));
    }

    #[tokio::test]
    async fn feature_add_blocked_then_unblock_round_trips() {
        let db = seeded_db().await;
        FeatureStore::new(&db).create(&feature(1)).await.unwrap();
        FeatureStore::new(&db).create(&feature(2)).await.unwrap();
        feature_add_blocked(&db, &serde_json::json!({"from": 2, "to": 1})).await.unwrap();
        feature_unblock(&db, &serde_json::json!({"from": 2, "to": 1})).await.unwrap();
        let shown = feature_show(&db, &serde_json::json!({"index": 2})).await.unwrap();
        assert!(shown.contains("\"blocked_by\": []"));
    }

    #[tokio::test]
    async fn decision_record_then_list() {
        let db = seeded_db().await;
        decision_record(
            &db,
            &serde_json::json!({"session_id": 1, "summary": "picked approach A"}),
        )
        .await
        .unwrap();
        let listed = decision_list(&db, &serde_json::json!({"session_id": 1})).await.unwrap();
        assert!(listed.contains("picked approach A"));
    }

    #[tokio::test]
    async fn hypothesis_record_then_resolve() {
        let db = seeded_db().await;
        let created = hypothesis_record(
            &db,
            &serde_json::json!({"session_id": 1, "statement": "race in the watchdog"}),
        )
        .await
        .unwrap();
        assert!(created.contains("\"status\": \"open\""));

        let resolved = hypothesis_resolve(
            &db,
            &serde_json::json!({"id": 1, "confirmed": true, "evidence": "reproduced under load"}),
        )
        .await
        .unwrap();
        assert!(resolved.contains("\"status\": \"confirmed\""));
    }
}
