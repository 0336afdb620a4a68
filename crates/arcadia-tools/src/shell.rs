//! `execute_command`: runs a shell command with a persistent working
//! directory, re-checked against the Security Gate before it runs.
//!
//! The Hook Pipeline already runs the Security Gate ahead of EXEC
//! (step 5), but a directly-invoked tool should not trust that its
//! caller is always the pipeline — checking again here is the
//! defense-in-depth the tool family's implementation note calls for.

use crate::{BuiltinTool, ToolContext, ToolError, ToolResult};
use arcadia_security::{GateDecision, SecurityPolicy, ToolAction};
use serde_json::Value;
use std::path::PathBuf;
use tokio::process::Command;

/// Default timeout in milliseconds (2 minutes).
const DEFAULT_TIMEOUT_MS: u64 = 120_000;
/// Maximum timeout in milliseconds (10 minutes).
const MAX_TIMEOUT_MS: u64 = 600_000;
/// Sentinel used to extract the post-command working directory.
const CWD_SENTINEL: &str = "__ARCADIA_CWD__";

/// Built-in tool for executing shell commands.
pub struct ExecuteCommandTool {
    policy: SecurityPolicy,
}

impl Default for ExecuteCommandTool {
    fn default() -> Self {
        Self {
            policy: SecurityPolicy::default(),
        }
    }
}

impl ExecuteCommandTool {
    /// Gate against a specific policy instead of the default one.
    #[must_use]
    pub fn with_policy(policy: SecurityPolicy) -> Self {
        Self { policy }
    }
}

#[async_trait::async_trait]
impl BuiltinTool for ExecuteCommandTool {
    fn name(&self) -> &'static str {
        "execute_command"
    }

    fn description(&self) -> &'static str {
        "Executes a shell command. The working directory persists between invocations. \
         Subject to the Security Gate's hard boundaries (blocked commands, denied paths). \
         Optional timeout in milliseconds (max 600000)."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The command to execute"
                },
                "args": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Arguments to the command"
                },
                "timeout": {
                    "type": "integer",
                    "description": "Timeout in milliseconds (default: 120000, max: 600000)"
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult {
        let command = args
            .get("command")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments("command is required".into()))?;

        let cmd_args: Vec<String> = args
            .get("args")
            .and_then(Value::as_array)
            .map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
            .unwrap_or_default();

        if let GateDecision::Deny { reason } = self.policy.check(&ToolAction::ExecuteCommand {
            command: command.to_string(),
            args: cmd_args,
        }) {
            return Err(ToolError::Denied(reason));
        }

        let timeout_ms = args
            .get("timeout")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_TIMEOUT_MS)
            .min(MAX_TIMEOUT_MS);

        let cwd = ctx.cwd.read().await.clone();

        let wrapped = format!(
            "{command}\n__ARCADIA_EXIT__=$?\necho \"{CWD_SENTINEL}\"\npwd\nexit $__ARCADIA_EXIT__"
        );

        let result = tokio::time::timeout(
            std::time::Duration::from_millis(timeout_ms),
            run_shell(&wrapped, &cwd),
        )
        .await;

        match result {
            Ok(Ok((stdout, stderr, exit_code))) => {
                let (output, new_cwd) = parse_sentinel_output(&stdout);

                if let Some(new_cwd) = new_cwd {
                    let mut cwd_lock = ctx.cwd.write().await;
                    *cwd_lock = new_cwd;
                }

                let mut result_text = String::new();

                if !output.is_empty() {
                    result_text.push_str(&output);
                }

                if !stderr.is_empty() {
                    if !result_text.is_empty() {
                        result_text.push('\n');
                    }
                    result_text.push_str("STDERR:\n");
                    result_text.push_str(&stderr);
                }

                if exit_code != 0 {
                    if !result_text.is_empty() {
                        result_text.push('\n');
                    }
                    result_text.push_str("(exit code: ");
                    result_text.push_str(&exit_code.to_string());
                    result_text.push(')');
                }

                if result_text.is_empty() {
                    result_text.push_str("(no output)");
                }

                Ok(result_text)
            },
            Ok(Err(e)) => Err(ToolError::ExecutionFailed(e.to_string())),
            Err(_) => Err(ToolError::Timeout(timeout_ms)),
        }
    }
}

async fn run_shell(command: &str, cwd: &std::path::Path) -> std::io::Result<(String, String, i32)> {
    let output = Command::new("bash")
        .arg("-c")
        .arg(command)
        .current_dir(cwd)
        .output()
        .await?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    Ok((stdout, stderr, exit_code))
}

fn parse_sentinel_output(stdout: &str) -> (String, Option<PathBuf>) {
    if let Some(sentinel_pos) = stdout.find(CWD_SENTINEL) {
        let output = stdout[..sentinel_pos].trim_end().to_string();
        #[allow(clippy::arithmetic_side_effects)]
        let after_sentinel = &stdout[sentinel_pos + CWD_SENTINEL.len()..];
        let new_cwd = after_sentinel
            .lines()
            .find(|l| !l.is_empty())
            .map(|l| PathBuf::from(l.trim()));
        (output, new_cwd)
    } else {
        (stdout.to_string(), None)
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
    async fn echoes_stdout() {
        let ctx = ctx_with_root(&std::env::temp_dir());
        let result = ExecuteCommandTool::default()
            .execute(serde_json::json!({"command": "echo hello"}), &ctx)
            .await
            .unwrap();

        assert!(result.contains("hello"));
    }

    #[tokio::test]
    async fn reports_nonzero_exit_code() {
        let ctx = ctx_with_root(&std::env::temp_dir());
        let result = ExecuteCommandTool::default()
            .execute(serde_json::json!({"command": "exit 42"}), &ctx)
            .await
            .unwrap();

        assert!(result.contains("exit code: 42"));
    }

    #[tokio::test]
    async fn persists_cwd_across_calls() {
        let dir = TempDir::new().unwrap();
        let ctx = ctx_with_root(dir.path());
        std::fs::create_dir(dir.path().join("subdir")).unwrap();

        ExecuteCommandTool::default()
            .execute(serde_json::json!({"command": "cd subdir"}), &ctx)
            .await
            .unwrap();

        let result = ExecuteCommandTool::default()
            .execute(serde_json::json!({"command": "pwd"}), &ctx)
            .await
            .unwrap();

        assert!(result.contains("subdir"));
    }

    #[tokio::test]
    async fn times_out() {
        let ctx = ctx_with_root(&std::env::temp_dir());
        let result = ExecuteCommandTool::default()
            .execute(serde_json::json!({"command": "sleep 10", "timeout": 100}), &ctx)
            .await;

        assert!(matches!(result.unwrap_err(), ToolError::Timeout(100)));
    }

    #[tokio::test]
    async fn denies_a_blocked_command() {
        let ctx = ctx_with_root(&std::env::temp_dir());
        let result = ExecuteCommandTool::default()
            .execute(serde_json::json!({"command": "sudo", "args": ["reboot"]}), &ctx)
            .await;

        assert!(matches!(result.unwrap_err(), ToolError::Denied(_)));
    }
}
