//! Security policy — hard boundaries on tool invocations (§4.3).
//!
//! The [`SecurityPolicy`] is the Security Gate's configuration: a fixed set
//! of commands, paths, and hosts that are never allowed, checked before a
//! tool call reaches the runtime. It is not a risk scorer — everything that
//! isn't explicitly blocked is [`GateDecision::Allow`]; the Risk Classifier
//! downstream decides whether an allowed action still needs a human.
//!
//! # Check order
//!
//! 1. Is the command/pattern in `blocked_tools`? -> `Deny`
//! 2. Does the path contain a traversal sequence? -> `Deny`
//! 3. Does the path match a denied glob? -> `Deny`
//! 4. Are `allowed_paths` configured and the path doesn't match any? -> `Deny`
//! 5. Does the host match a denied host? -> `Deny`
//! 6. Are `allowed_hosts` configured and the host isn't among them? -> `Deny`
//! 7. Do the arguments exceed `max_argument_size`? -> `Deny`
//! 8. Otherwise -> `Allow`

use globset::Glob;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::action::ToolAction;
use crate::error::{SecurityError, SecurityResult};

/// Security policy defining hard boundaries on tool invocations.
///
/// # Example
///
/// ```
/// use arcadia_security::{SecurityPolicy, ToolAction};
///
/// let policy = SecurityPolicy::default();
/// let action = ToolAction::ExecuteCommand {
///     command: "rm".to_string(),
///     args: vec!["-rf".to_string(), "/".to_string()],
/// };
/// assert!(policy.check(&action).is_denied());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityPolicy {
    /// Commands that are never allowed (e.g. `"sudo"`), plus full
    /// `"command arg1 arg2"` prefixes (e.g. `"rm -rf /"`).
    pub blocked_tools: HashSet<String>,

    /// Glob patterns for allowed file paths.
    ///
    /// If non-empty, only paths matching at least one pattern pass. If
    /// empty, path filtering is not applied by this check.
    pub allowed_paths: Vec<String>,

    /// Glob patterns for denied file paths. Checked before `allowed_paths`.
    pub denied_paths: Vec<String>,

    /// Allowed network hosts. If non-empty, only these hosts pass.
    pub allowed_hosts: Vec<String>,

    /// Denied network hosts, checked before `allowed_hosts`.
    pub denied_hosts: Vec<String>,

    /// Maximum combined size of command arguments in bytes. 0 = no limit.
    pub max_argument_size: usize,
}

impl SecurityPolicy {
    /// A policy with nothing blocked.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            blocked_tools: HashSet::new(),
            allowed_paths: Vec::new(),
            denied_paths: Vec::new(),
            allowed_hosts: Vec::new(),
            denied_hosts: Vec::new(),
            max_argument_size: 0,
        }
    }

    /// Compile every configured glob pattern, surfacing the first invalid
    /// one. Call this once after loading a policy from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::InvalidPattern`] if a path or host pattern
    /// isn't a valid glob.
    pub fn validate(&self) -> SecurityResult<()> {
        for pattern in self.allowed_paths.iter().chain(&self.denied_paths) {
            Glob::new(pattern).map_err(|e| SecurityError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Evaluate a tool invocation against this policy.
    #[must_use]
    pub fn check(&self, action: &ToolAction) -> GateDecision {
        match action {
            ToolAction::ExecuteCommand { command, args } => {
                self.check_execute_command(command, args)
            },
            ToolAction::FileRead { path }
            | ToolAction::FileWrite { path }
            | ToolAction::FileDelete { path } => self.check_file_path(path),
            ToolAction::NetworkRequest { host, .. } => self.check_network(host),
        }
    }

    fn check_execute_command(&self, command: &str, args: &[String]) -> GateDecision {
        if self.blocked_tools.contains(command) {
            return GateDecision::Deny {
                reason: format!("command '{command}' is blocked by policy"),
            };
        }

        if !args.is_empty() {
            let full_command = format!("{command} {}", args.join(" "));
            for blocked in &self.blocked_tools {
                if full_command.starts_with(blocked) {
                    return GateDecision::Deny {
                        reason: format!(
                            "command '{full_command}' matches blocked pattern '{blocked}'"
                        ),
                    };
                }
            }
        }

        if self.max_argument_size > 0 {
            let total_size: usize = args.iter().map(String::len).sum();
            if total_size > self.max_argument_size {
                return GateDecision::Deny {
                    reason: format!(
                        "argument size {total_size} exceeds limit {}",
                        self.max_argument_size
                    ),
                };
            }
        }

        GateDecision::Allow
    }

    fn check_file_path(&self, path: &str) -> GateDecision {
        if std::path::Path::new(path)
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return GateDecision::Deny {
                reason: "path contains traversal sequence (..)".to_string(),
            };
        }

        if matches_any_glob(&self.denied_paths, path) {
            return GateDecision::Deny {
                reason: format!("path '{path}' is denied by policy"),
            };
        }

        if !self.allowed_paths.is_empty() && !matches_any_glob(&self.allowed_paths, path) {
            return GateDecision::Deny {
                reason: format!("path '{path}' is not in allowed paths"),
            };
        }

        GateDecision::Allow
    }

    fn check_network(&self, host: &str) -> GateDecision {
        if self.denied_hosts.iter().any(|h| h == host) {
            return GateDecision::Deny {
                reason: format!("host '{host}' is denied by policy"),
            };
        }

        if !self.allowed_hosts.is_empty() && !self.allowed_hosts.iter().any(|h| h == host) {
            return GateDecision::Deny {
                reason: format!("host '{host}' is not in allowed hosts"),
            };
        }

        GateDecision::Allow
    }
}

impl Default for SecurityPolicy {
    /// Sensible defaults:
    /// - Blocks dangerous commands (`rm -rf /`, `sudo`, `mkfs`, `dd`, ...)
    /// - Denies `/etc`, `/boot`, `/sys`, `/proc`, `/dev`
    /// - 1 MB argument size limit
    fn default() -> Self {
        let blocked_tools: HashSet<String> = [
            "rm -rf /",
            "rm -rf /*",
            "sudo",
            "su",
            "mkfs",
            "dd",
            "chmod 777",
            "shutdown",
            "reboot",
            "init",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let denied_paths: Vec<String> = vec![
            "/etc/**".to_string(),
            "/boot/**".to_string(),
            "/sys/**".to_string(),
            "/proc/**".to_string(),
            "/dev/**".to_string(),
        ];

        Self {
            blocked_tools,
            allowed_paths: Vec::new(),
            denied_paths,
            allowed_hosts: Vec::new(),
            denied_hosts: Vec::new(),
            max_argument_size: 1024 * 1024,
        }
    }
}

/// Check if a path matches any glob pattern in the list.
fn matches_any_glob(patterns: &[String], path: &str) -> bool {
    patterns.iter().any(|pattern| {
        Glob::new(pattern)
            .ok()
            .is_some_and(|g| g.compile_matcher().is_match(path))
    })
}

/// The Security Gate's verdict on a tool invocation: a hard boundary, not
/// a risk score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// The action passes every hard boundary. It may still need approval
    /// from the Risk Classifier or Autonomy Manager downstream.
    Allow,
    /// The action is blocked outright and must not reach the runtime.
    Deny {
        /// Why the action was denied.
        reason: String,
    },
}

impl GateDecision {
    /// Whether this decision allows the action through the gate.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Whether this decision denies the action.
    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Deny { .. })
    }
}

impl fmt::Display for GateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => write!(f, "allow"),
            Self::Deny { reason } => write!(f, "deny: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_blocks_dangerous_commands() {
        let policy = SecurityPolicy::default();

        let action = ToolAction::ExecuteCommand {
            command: "sudo".to_string(),
            args: vec!["rm".to_string()],
        };
        assert!(policy.check(&action).is_denied());

        let action = ToolAction::ExecuteCommand {
            command: "mkfs".to_string(),
            args: vec![],
        };
        assert!(policy.check(&action).is_denied());
    }

    #[test]
    fn default_blocks_rm_rf_root() {
        let policy = SecurityPolicy::default();

        let action = ToolAction::ExecuteCommand {
            command: "rm".to_string(),
            args: vec!["-rf".to_string(), "/".to_string()],
        };
        assert!(policy.check(&action).is_denied());
    }

    #[test]
    fn default_blocks_system_paths() {
        let policy = SecurityPolicy::default();

        let action = ToolAction::FileWrite {
            path: "/etc/passwd".to_string(),
        };
        assert!(policy.check(&action).is_denied());

        let action = ToolAction::FileDelete {
            path: "/boot/vmlinuz".to_string(),
        };
        assert!(policy.check(&action).is_denied());
    }

    #[test]
    fn default_allows_ordinary_file_and_network_actions() {
        let policy = SecurityPolicy::default();

        let action = ToolAction::FileDelete {
            path: "/home/user/file.txt".to_string(),
        };
        assert!(policy.check(&action).is_allowed());

        let action = ToolAction::NetworkRequest {
            host: "api.example.com".to_string(),
            port: 443,
        };
        assert!(policy.check(&action).is_allowed());
    }

    #[test]
    fn permissive_allows_everything() {
        let policy = SecurityPolicy::permissive();

        let action = ToolAction::NetworkRequest {
            host: "evil.com".to_string(),
            port: 80,
        };
        assert!(policy.check(&action).is_allowed());
    }

    #[test]
    fn denied_path_blocks_read_and_write() {
        let mut policy = SecurityPolicy::permissive();
        policy.denied_paths.push("/secrets/**".to_string());

        let action = ToolAction::FileWrite {
            path: "/secrets/key.pem".to_string(),
        };
        assert!(policy.check(&action).is_denied());
    }

    #[test]
    fn allowed_paths_enforcement() {
        let mut policy = SecurityPolicy::permissive();
        policy.allowed_paths.push("/home/user/**".to_string());

        let action = ToolAction::FileWrite {
            path: "/home/user/docs/file.txt".to_string(),
        };
        assert!(policy.check(&action).is_allowed());

        let action = ToolAction::FileWrite {
            path: "/var/lib/data.db".to_string(),
        };
        assert!(policy.check(&action).is_denied());
    }

    #[test]
    fn path_traversal_denied() {
        let policy = SecurityPolicy::permissive();

        let action = ToolAction::FileWrite {
            path: "/home/user/../../etc/passwd".to_string(),
        };
        assert!(policy.check(&action).is_denied());
    }

    #[test]
    fn denied_host_blocks_network_request() {
        let mut policy = SecurityPolicy::permissive();
        policy.denied_hosts.push("evil.com".to_string());

        let action = ToolAction::NetworkRequest {
            host: "evil.com".to_string(),
            port: 443,
        };
        assert!(policy.check(&action).is_denied());
    }

    #[test]
    fn allowed_hosts_enforcement() {
        let mut policy = SecurityPolicy::permissive();
        policy.allowed_hosts.push("api.example.com".to_string());

        let action = ToolAction::NetworkRequest {
            host: "api.example.com".to_string(),
            port: 443,
        };
        assert!(policy.check(&action).is_allowed());

        let action = ToolAction::NetworkRequest {
            host: "other.com".to_string(),
            port: 443,
        };
        assert!(policy.check(&action).is_denied());
    }

    #[test]
    fn argument_size_limit() {
        let mut policy = SecurityPolicy::permissive();
        policy.max_argument_size = 100;

        let action = ToolAction::ExecuteCommand {
            command: "echo".to_string(),
            args: vec!["x".repeat(200)],
        };
        assert!(policy.check(&action).is_denied());
    }

    #[test]
    fn argument_size_within_limit_is_allowed() {
        let mut policy = SecurityPolicy::permissive();
        policy.max_argument_size = 100;

        let action = ToolAction::ExecuteCommand {
            command: "echo".to_string(),
            args: vec!["hello".to_string()],
        };
        assert!(policy.check(&action).is_allowed());
    }

    #[test]
    fn gate_decision_display() {
        assert_eq!(GateDecision::Allow.to_string(), "allow");
        let denied = GateDecision::Deny {
            reason: "test".to_string(),
        };
        assert!(denied.to_string().starts_with("deny:"));
    }

    #[test]
    fn policy_serialization_round_trips() {
        let policy = SecurityPolicy::default();
        let json = serde_json::to_string(&policy).unwrap();
        let deserialized: SecurityPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.blocked_tools.len(), policy.blocked_tools.len());
    }

    #[test]
    fn validate_rejects_bad_glob() {
        let mut policy = SecurityPolicy::permissive();
        policy.denied_paths.push("[".to_string());
        assert!(policy.validate().is_err());
    }

    #[test]
    fn validate_accepts_default_policy() {
        assert!(SecurityPolicy::default().validate().is_ok());
    }
}
