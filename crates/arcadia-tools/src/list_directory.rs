//! `list_directory`: lists a directory's immediate entries.
//!
//! Grounded on [`crate::glob`]'s traversal conventions (hidden entries
//! skipped, paths reported relative to the search root) but walks only
//! one level deep rather than recursively.

use crate::{BuiltinTool, ToolContext, ToolError, ToolResult};
use serde_json::Value;
use std::fmt::Write;
use std::path::PathBuf;

/// Built-in tool for listing a directory's contents.
pub struct ListDirectoryTool;

#[async_trait::async_trait]
impl BuiltinTool for ListDirectoryTool {
    fn name(&self) -> &'static str {
        "list_directory"
    }

    fn description(&self) -> &'static str {
        "Lists the immediate contents of a directory. Directories are shown with a trailing slash."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Directory to list (defaults to workspace root)"
                }
            }
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult {
        let dir = args
            .get("path")
            .and_then(Value::as_str)
            .map_or_else(|| ctx.workspace_root.clone(), PathBuf::from);

        if !dir.exists() {
            return Err(ToolError::PathNotFound(dir.display().to_string()));
        }
        if !dir.is_dir() {
            return Err(ToolError::InvalidArguments(format!(
                "{} is not a directory",
                dir.display()
            )));
        }

        let mut entries: Vec<(String, bool)> = Vec::new();
        let mut read_dir = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
            entries.push((name, is_dir));
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        if entries.is_empty() {
            return Ok("(empty directory)".to_string());
        }

        let mut output = String::new();
        for (name, is_dir) in &entries {
            if *is_dir {
                let _ = writeln!(output, "{name}/");
            } else {
                let _ = writeln!(output, "{name}");
            }
        }
        Ok(output.trim_end().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ctx_with_root(root: &std::path::Path) -> ToolContext {
        ToolContext::new(root.to_path_buf())
    }

    #[tokio::test]
    async fn lists_files_and_dirs() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let ctx = ctx_with_root(dir.path());
        let result = ListDirectoryTool.execute(serde_json::json!({}), &ctx).await.unwrap();

        assert!(result.contains("a.txt"));
        assert!(result.contains("sub/"));
    }

    #[tokio::test]
    async fn skips_hidden_entries() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".hidden"), "").unwrap();
        std::fs::write(dir.path().join("visible.txt"), "").unwrap();

        let ctx = ctx_with_root(dir.path());
        let result = ListDirectoryTool.execute(serde_json::json!({}), &ctx).await.unwrap();

        assert!(result.contains("visible.txt"));
        assert!(!result.contains(".hidden"));
    }

    #[tokio::test]
    async fn reports_empty_directory() {
        let dir = TempDir::new().unwrap();
        let ctx = ctx_with_root(dir.path());
        let result = ListDirectoryTool.execute(serde_json::json!({}), &ctx).await.unwrap();
        assert_eq!(result, "(empty directory)");
    }

    #[tokio::test]
    async fn rejects_nonexistent_path() {
        let ctx = ctx_with_root(&std::env::temp_dir());
        let result = ListDirectoryTool
            .execute(serde_json::json!({"path": "/nonexistent/arcadia/path"}), &ctx)
            .await;
        assert!(result.is_err());
    }
}
