//! [`ArcadiaToolExecutor`]: the `arcadia_hooks::ToolExecutor` implementation
//! the EXEC stage (step 6) dispatches through.
//!
//! Splits incoming calls across the two tool families: file/shell/
//! evidence calls run through the in-process [`crate::ToolRegistry`];
//! everything else is matched by name against [`crate::state_tools`].

use crate::{state_tools, ToolContext, ToolError, ToolRegistry};
use arcadia_hooks::{ToolCallContext, ToolExecutor, ToolFailure, ToolOutcome};
use arcadia_storage::Database;
use async_trait::async_trait;
use std::path::PathBuf;

/// Ties the [`crate::BuiltinTool`] registry and the State-Store-backed
/// query tools together behind one `ToolExecutor`.
pub struct ArcadiaToolExecutor {
    registry: ToolRegistry,
    tool_ctx: ToolContext,
    db: Database,
    process_tracker: crate::ProcessTracker,
}

impl ArcadiaToolExecutor {
    /// Build an executor rooted at `workspace_root`, backed by `db`.
    #[must_use]
    pub fn new(workspace_root: PathBuf, db: Database) -> Self {
        Self {
            registry: ToolRegistry::with_defaults(),
            tool_ctx: ToolContext::new(workspace_root),
            db,
            process_tracker: crate::ProcessTracker::new(),
        }
    }

    /// The catalog entries exposed to the agent runtime for every
    /// registered built-in tool. State-backed query tools aren't
    /// schema-driven the same way and are documented in the session
    /// prompt's tool-usage guidance instead.
    #[must_use]
    pub fn builtin_catalog(&self) -> Vec<arcadia_core::runtime::ToolCatalogEntry> {
        self.registry.catalog()
    }

    async fn run_state_tool(&self, name: &str, args: &serde_json::Value) -> Result<String, ToolError> {
        match name {
            "feature_next" => state_tools::feature_next(&self.db, args).await,
            "feature_show" => state_tools::feature_show(&self.db, args).await,
            "feature_list" => state_tools::feature_list(&self.db, args).await,
            "feature_search" => state_tools::feature_search(&self.db, args).await,
            "feature_mark_passing" => state_tools::feature_mark_passing(&self.db, args).await,
            "feature_add_blocked" => state_tools::feature_add_blocked(&self.db, args).await,
            "feature_unblock" => state_tools::feature_unblock(&self.db, args).await,
            "memory_search" => state_tools::memory_search(&self.db, args).await,
            "memory_hot" => state_tools::memory_hot(&self.db, args).await,
            "decision_record" => state_tools::decision_record(&self.db, args).await,
            "decision_list" => state_tools::decision_list(&self.db, args).await,
            "hypothesis_record" => state_tools::hypothesis_record(&self.db, args).await,
            "hypothesis_resolve" => state_tools::hypothesis_resolve(&self.db, args).await,
            "hypothesis_list" => state_tools::hypothesis_list(&self.db, args).await,
            "intervention_record" => state_tools::intervention_record(&self.db, args).await,
            "intervention_list" => state_tools::intervention_list(&self.db, args).await,
            "server_start" => self.server_start(args).await,
            "server_stop" => self.server_stop(args).await,
            "server_wait" => self.server_wait(args).await,
            "server_status" => self.server_status(args).await,
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }

    async fn server_start(&self, args: &serde_json::Value) -> Result<String, ToolError> {
        let name = args
            .get("name")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments("name is required".into()))?;
        let command = args
            .get("command")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments("command is required".into()))?;
        let cwd = self.tool_ctx.cwd.read().await.clone();
        self.process_tracker.start(name, command, &cwd).await?;
        Ok(format!("started '{name}'"))
    }

    async fn server_stop(&self, args: &serde_json::Value) -> Result<String, ToolError> {
        let name = args
            .get("name")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments("name is required".into()))?;
        self.process_tracker.stop(name).await?;
        Ok(format!("stopped '{name}'"))
    }

    async fn server_wait(&self, args: &serde_json::Value) -> Result<String, ToolError> {
        let name = args
            .get("name")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments("name is required".into()))?;
        let code = self.process_tracker.wait(name).await?;
        Ok(format!("'{name}' exited with code {code:?}"))
    }

    async fn server_status(&self, args: &serde_json::Value) -> Result<String, ToolError> {
        let name = args
            .get("name")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments("name is required".into()))?;
        Ok(format!("{:?}", self.process_tracker.status(name).await))
    }
}

#[async_trait]
impl ToolExecutor for ArcadiaToolExecutor {
    async fn execute(&self, ctx: &ToolCallContext) -> Result<ToolOutcome, ToolFailure> {
        let result = if let Some(tool) = self.registry.get(&ctx.tool_name) {
            tool.execute(ctx.raw_input.clone(), &self.tool_ctx).await
        } else {
            self.run_state_tool(&ctx.tool_name, &ctx.raw_input).await
        };

        let output = result.map_err(|e| ToolFailure::new(e.to_string()))?;

        if ctx.tool_name == "feature_mark_passing" {
            if let Some(index) = ctx.raw_input.get("index").and_then(serde_json::Value::as_i64) {
                return Ok(ToolOutcome::new(output).completing_feature(index));
            }
        }

        Ok(ToolOutcome::new(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcadia_core::SessionId;
    use arcadia_risk::ToolInvocation;

    async fn executor() -> ArcadiaToolExecutor {
        let db = Database::connect_memory().await.unwrap();
        ArcadiaToolExecutor::new(std::env::temp_dir(), db)
    }

    #[tokio::test]
    async fn dispatches_file_tools_through_the_builtin_registry() {
        let exec = executor().await;
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("a.txt");

        let ctx = ToolCallContext::new(
            SessionId::new(1),
            "write_file",
            ToolInvocation::FileWrite { path: path.display().to_string() },
        )
        .with_raw_input(serde_json::json!({"file_path": path.to_str().unwrap(), "content": "hi"}));

        let outcome = exec.execute(&ctx).await.unwrap();
        assert!(outcome.output.contains("2 bytes"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hi");
    }

    #[tokio::test]
    async fn dispatches_state_tools_by_name() {
        let exec = executor().await;
        let ctx = ToolCallContext::new(
            SessionId::new(1),
            "feature_list",
            ToolInvocation::Named { name: "feature_list".into(), rendered_args: String::new() },
        )
        .with_raw_input(serde_json::json!({}));

        let outcome = exec.execute(&ctx).await.unwrap();
        assert_eq!(outcome.output, "[]");
    }

    #[tokio::test]
    async fn marking_a_feature_passing_reports_completion() {
        let exec = executor().await;
        let feature = arcadia_storage::models::Feature {
            index: 1,
            category: "auth".into(),
            description: "login".into(),
            steps: vec![],
            passes: false,
            priority: arcadia_storage::models::Priority::P2,
            failure_count: 0,
            last_worked: None,
            blocked_by: vec![],
            blocks: vec![],
            verified_at: None,
            verification_artifacts: vec![],
            blocked_reason: None,
            skip_verification: true,
        };
        arcadia_storage::FeatureStore::new(&exec.db).create(&feature).await.unwrap();

        let ctx = ToolCallContext::new(
            SessionId::new(1),
            "feature_mark_passing",
            ToolInvocation::Named { name: "feature_mark_passing".into(), rendered_args: String::new() },
        )
        .with_raw_input(serde_json::json!({"index": 1}));

        let outcome = exec.execute(&ctx).await.unwrap();
        assert_eq!(outcome.feature_completed, Some(1));
    }

    #[tokio::test]
    async fn unknown_tool_name_fails() {
        let exec = executor().await;
        let ctx = ToolCallContext::new(
            SessionId::new(1),
            "not_a_real_tool",
            ToolInvocation::Named { name: "not_a_real_tool".into(), rendered_args: String::new() },
        );
        assert!(exec.execute(&ctx).await.is_err());
    }
}
