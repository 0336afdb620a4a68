//! `grep`: searches file contents for a pattern.
//!
//! Grounded on [`crate::glob`]'s `walkdir`/hidden-dir-skipping traversal,
//! applied to file contents instead of file names.

use crate::{BuiltinTool, ToolContext, ToolError, ToolResult};
use regex::Regex;
use serde_json::Value;
use std::fmt::Write;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Built-in tool for searching file contents by pattern.
pub struct GrepTool;

#[async_trait::async_trait]
impl BuiltinTool for GrepTool {
    fn name(&self) -> &'static str {
        "grep"
    }

    fn description(&self) -> &'static str {
        "Searches file contents for a regular expression pattern. \
         Returns matching lines as \"path:line_number:line\"."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "pattern": {
                    "type": "string",
                    "description": "Regular expression to search for"
                },
                "path": {
                    "type": "string",
                    "description": "Directory to search in (defaults to workspace root)"
                }
            },
            "required": ["pattern"]
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult {
        let pattern = args
            .get("pattern")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments("pattern is required".into()))?;

        let search_dir = args
            .get("path")
            .and_then(Value::as_str)
            .map_or_else(|| ctx.workspace_root.clone(), PathBuf::from);

        if !search_dir.exists() {
            return Err(ToolError::PathNotFound(search_dir.display().to_string()));
        }

        let re = Regex::new(pattern)
            .map_err(|e| ToolError::InvalidArguments(format!("invalid pattern: {e}")))?;

        let mut matches = Vec::new();
        for entry in WalkDir::new(&search_dir)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0 || e.file_name().to_str().is_none_or(|s| !s.starts_with('.'))
            })
        {
            let Ok(entry) = entry else { continue };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(content) = tokio::fs::read_to_string(entry.path()).await else {
                continue;
            };
            for (line_no, line) in content.lines().enumerate() {
                if re.is_match(line) {
                    matches.push((entry.path().to_path_buf(), line_no + 1, line.to_string()));
                }
            }
        }

        if matches.is_empty() {
            return Ok(format!("No matches for \"{pattern}\""));
        }

        let mut output = String::new();
        for (path, line_no, line) in &matches {
            let _ = writeln!(output, "{}:{line_no}:{line}", path.display());
        }
        let _ = write!(output, "\n({} matches)", matches.len());
        Ok(crate::truncate_output(output))
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
    async fn finds_matching_lines() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.rs"), "fn main() {}\nfn helper() {}\n").unwrap();

        let ctx = ctx_with_root(dir.path());
        let result = GrepTool
            .execute(serde_json::json!({"pattern": "fn helper"}), &ctx)
            .await
            .unwrap();

        assert!(result.contains("a.rs:2:fn helper() {}"));
        assert!(!result.contains("fn main"));
    }

    #[tokio::test]
    async fn reports_no_matches() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.rs"), "fn main() {}\n").unwrap();

        let ctx = ctx_with_root(dir.path());
        let result = GrepTool
            .execute(serde_json::json!({"pattern": "nonexistent_token"}), &ctx)
            .await
            .unwrap();

        assert!(result.contains("No matches"));
    }

    #[tokio::test]
    async fn rejects_invalid_pattern() {
        let ctx = ctx_with_root(&std::env::temp_dir());
        let result = GrepTool
            .execute(serde_json::json!({"pattern": "(unterminated"}), &ctx)
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn skips_hidden_directories() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        std::fs::write(dir.path().join(".git/config"), "token=secret\n").unwrap();
        std::fs::write(dir.path().join("visible.rs"), "token=public\n").unwrap();

        let ctx = ctx_with_root(dir.path());
        let result = GrepTool
            .execute(serde_json::json!({"pattern": "token"}), &ctx)
            .await
            .unwrap();

        assert!(result.contains("visible.rs"));
        assert!(!result.contains(".git"));
    }
}
