//! Escalation rule repository (§4.10).

use crate::db::Database;
use crate::error::{StorageError, StorageResult};
use crate::models::EscalationRule;

const TABLE: &str = "escalation_rule";

/// Repository over the `escalation_rule` table.
pub struct EscalationRuleStore<'a> {
    db: &'a Database,
}

impl<'a> EscalationRuleStore<'a> {
    /// Wrap a connection.
    #[must_use]
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert or replace a rule (built-in or custom).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn put(&self, rule: &EscalationRule) -> StorageResult<EscalationRule> {
        let updated: Option<EscalationRule> = self
            .db
            .client()
            .update((TABLE, rule.id.clone()))
            .content(rule.clone())
            .await?;
        match updated {
            Some(row) => Ok(row),
            None => {
                let created: Option<EscalationRule> = self
                    .db
                    .client()
                    .create((TABLE, rule.id.clone()))
                    .content(rule.clone())
                    .await?;
                created.ok_or_else(|| StorageError::Internal("create returned no row".into()))
            },
        }
    }

    /// Every known rule, built-in and custom, loaded once per
    /// evaluation pass.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self) -> StorageResult<Vec<EscalationRule>> {
        let rows: Vec<EscalationRule> = self.db.client().select(TABLE).await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InjectionType;

    fn sample() -> EscalationRule {
        EscalationRule {
            id: "builtin:low_confidence".into(),
            condition: "confidence < 0.5".into(),
            severity: 2,
            injection_type: InjectionType::Guidance,
            message_template: "low confidence ({reason}) on {tool}".into(),
            suggested_actions: vec!["proceed".into(), "pause".into()],
            auto_pause: false,
            timeout_s: 600,
        }
    }

    #[tokio::test]
    async fn put_then_list_round_trips() {
        let db = Database::connect_memory().await.unwrap();
        let store = EscalationRuleStore::new(&db);
        store.put(&sample()).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].severity, 2);
    }

    #[tokio::test]
    async fn put_twice_replaces_rather_than_duplicates() {
        let db = Database::connect_memory().await.unwrap();
        let store = EscalationRuleStore::new(&db);
        store.put(&sample()).await.unwrap();
        let mut updated = sample();
        updated.severity = 4;
        store.put(&updated).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].severity, 4);
    }
}
