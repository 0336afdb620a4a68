//! `record_evidence`: validates an artifact contract (path + sha256)
//! ahead of persistence.
//!
//! Browser automation and screenshot capture are explicit Non-goals —
//! there is no driver here. What this tool owns is the contract a
//! caller must satisfy to claim a screenshot (or any other artifact)
//! as evidence: the file must exist under the workspace root and its
//! sha256 must match what's claimed. [`crate::executor::ArcadiaToolExecutor`]
//! turns a successful check into an `artifact` row; this tool only
//! validates.

use crate::{BuiltinTool, ToolContext, ToolError, ToolResult};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Built-in tool validating an evidence artifact's path and checksum.
pub struct EvidenceTool;

#[async_trait::async_trait]
impl BuiltinTool for EvidenceTool {
    fn name(&self) -> &'static str {
        "record_evidence"
    }

    fn description(&self) -> &'static str {
        "Validates a claimed evidence artifact (screenshot, test output, ...) against the file \
         on disk: confirms it exists and its sha256 checksum matches. Does not capture \
         screenshots or drive a browser."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Absolute path to the artifact file"
                },
                "sha256": {
                    "type": "string",
                    "description": "Claimed sha256 checksum, hex-encoded"
                }
            },
            "required": ["path", "sha256"]
        })
    }

    async fn execute(&self, args: Value, _ctx: &ToolContext) -> ToolResult {
        let path = args
            .get("path")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments("path is required".into()))?;

        let claimed = args
            .get("sha256")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments("sha256 is required".into()))?;

        let path_ref = std::path::Path::new(path);
        if !path_ref.exists() {
            return Err(ToolError::PathNotFound(path.to_string()));
        }

        let bytes = tokio::fs::read(path_ref).await?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let actual = hex::encode(hasher.finalize());

        if actual != claimed.to_lowercase() {
            return Err(ToolError::ExecutionFailed(format!(
                "checksum mismatch for {path}: claimed {claimed}, actual {actual}"
            )));
        }

        Ok(serde_json::json!({ "path": path, "sha256": actual }).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ToolContext {
        ToolContext::new(std::env::temp_dir())
    }

    #[tokio::test]
    async fn accepts_a_matching_checksum() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("shot.png");
        std::fs::write(&path, b"fake png bytes").unwrap();

        let mut hasher = Sha256::new();
        hasher.update(b"fake png bytes");
        let sha = hex::encode(hasher.finalize());

        let result = EvidenceTool
            .execute(
                serde_json::json!({"path": path.to_str().unwrap(), "sha256": sha}),
                &ctx(),
            )
            .await
            .unwrap();

        assert!(result.contains(&sha));
    }

    #[tokio::test]
    async fn rejects_a_mismatched_checksum() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("shot.png");
        std::fs::write(&path, b"fake png bytes").unwrap();

        let result = EvidenceTool
            .execute(
                serde_json::json!({"path": path.to_str().unwrap(), "sha256": "0".repeat(64)}),
                &ctx(),
            )
            .await;

        assert!(matches!(result.unwrap_err(), ToolError::ExecutionFailed(_)));
    }

    #[tokio::test]
    async fn rejects_a_missing_file() {
        let result = EvidenceTool
            .execute(
                serde_json::json!({"path": "/nonexistent/shot.png", "sha256": "a".repeat(64)}),
                &ctx(),
            )
            .await;

        assert!(matches!(result.unwrap_err(), ToolError::PathNotFound(_)));
    }
}
