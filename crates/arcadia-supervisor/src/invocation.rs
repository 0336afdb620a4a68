//! Best-effort mapping from a raw `RuntimeEvent::ToolCall` into the
//! [`ToolInvocation`] shape the Hook Pipeline's Risk Classifier scores.
//!
//! This belongs to the Tool Registry, which owns the tool catalog and
//! so knows each tool's argument shape precisely. Until that crate
//! exists this free function stands in for it, pattern-matching on
//! conventional argument names (`path`, `command`, `host`/`port`,
//! `destination`) and falling back to [`ToolInvocation::Named`] for
//! anything it doesn't recognize. Grounded on
//! `astrid-tools/src/lib.rs`'s dispatch match on `BuiltinTool` name,
//! adapted from a typed enum dispatch into a name-string sniff since
//! no typed tool catalog exists yet on this side.

use arcadia_risk::ToolInvocation;
use serde_json::Value;

/// Classify a tool call by its registered name and raw JSON input.
#[must_use]
pub fn classify_invocation(name: &str, input: &Value) -> ToolInvocation {
    let path = |field: &str| input.get(field).and_then(Value::as_str).map(str::to_string);

    match name {
        "read_file" | "list_directory" | "search_files" | "glob" | "grep" => {
            ToolInvocation::FileRead { path: path("path").unwrap_or_else(|| name.to_string()) }
        },
        "write_file" | "edit_file" | "append_file" => {
            ToolInvocation::FileWrite { path: path("path").unwrap_or_else(|| name.to_string()) }
        },
        "delete_file" | "remove_file" | "rm" => {
            ToolInvocation::FileDelete { path: path("path").unwrap_or_else(|| name.to_string()) }
        },
        "execute_command" | "run_shell" | "shell" | "bash" => ToolInvocation::ExecuteCommand {
            command: path("command").unwrap_or_else(|| name.to_string()),
            args: input
                .get("args")
                .and_then(Value::as_array)
                .map(|a| a.iter().filter_map(Value::as_str).map(str::to_string).collect())
                .unwrap_or_default(),
        },
        "http_request" | "fetch_url" | "network_request" => ToolInvocation::NetworkRequest {
            host: path("host").unwrap_or_else(|| name.to_string()),
            port: input.get("port").and_then(Value::as_u64).and_then(|p| u16::try_from(p).ok()).unwrap_or(443),
        },
        "send_data" | "upload" | "transmit" => ToolInvocation::TransmitData {
            destination: path("destination").unwrap_or_else(|| name.to_string()),
            data_type: path("data_type").unwrap_or_else(|| "unknown".to_string()),
        },
        _ => ToolInvocation::Named { name: name.to_string(), rendered_args: input.to_string() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recognizes_file_write_by_name() {
        let invocation = classify_invocation("write_file", &json!({"path": "/tmp/x"}));
        assert!(matches!(invocation, ToolInvocation::FileWrite { path } if path == "/tmp/x"));
    }

    #[test]
    fn recognizes_shell_commands_with_args() {
        let invocation = classify_invocation("bash", &json!({"command": "rm", "args": ["-rf", "/tmp"]}));
        assert!(matches!(
            invocation,
            ToolInvocation::ExecuteCommand { command, args }
                if command == "rm" && args == vec!["-rf".to_string(), "/tmp".to_string()]
        ));
    }

    #[test]
    fn unknown_tools_fall_back_to_named() {
        let invocation = classify_invocation("query_memory", &json!({"q": "auth"}));
        assert!(matches!(invocation, ToolInvocation::Named { name, .. } if name == "query_memory"));
    }
}
