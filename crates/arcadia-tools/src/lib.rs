#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! The Tool Registry (§4.12): the catalog of named operations the
//! agent can invoke, split into two families.
//!
//! File operations and gated shell exec run directly against the
//! project working tree as [`BuiltinTool`] implementations, registered
//! in a [`ToolRegistry`] — the same shape a coding agent's built-in
//! tool set normally takes. Feature/memory/decision/hypothesis/
//! intervention queries and server lifecycle management are thin
//! wrappers over the State Store and a process tracker; they don't
//! carry a JSON-schema catalog entry of their own beyond what
//! [`executor`] already builds, so they live as plain async functions
//! dispatched by name in [`state_tools`] rather than a second
//! `BuiltinTool` family.
//!
//! [`ArcadiaToolExecutor`] ties both families together behind
//! `arcadia_hooks::ToolExecutor`, the seam the Hook Pipeline's EXEC
//! stage calls through.

mod edit_file;
mod evidence;
mod glob;
mod grep;
mod list_directory;
mod read_file;
mod shell;
mod state_tools;
mod write_file;

pub mod executor;
pub mod process;

pub use edit_file::EditFileTool;
pub use evidence::EvidenceTool;
pub use executor::ArcadiaToolExecutor;
pub use glob::GlobTool;
pub use grep::GrepTool;
pub use list_directory::ListDirectoryTool;
pub use process::ProcessTracker;
pub use read_file::ReadFileTool;
pub use shell::ExecuteCommandTool;
pub use write_file::WriteFileTool;

use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Output longer than this is truncated before being shown to the
/// agent.
const MAX_OUTPUT_CHARS: usize = 30_000;

/// A tool that runs directly in-process against the project working
/// tree (file ops, shell exec, the evidence-artifact stub).
#[async_trait::async_trait]
pub trait BuiltinTool: Send + Sync {
    /// The tool's registered name (matches an `arcadia_core::runtime::ToolCatalogEntry::name`).
    fn name(&self) -> &'static str;

    /// Human-readable description shown to the agent.
    fn description(&self) -> &'static str;

    /// JSON Schema for the tool's arguments.
    fn input_schema(&self) -> Value;

    /// Run the tool.
    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult;
}

/// Shared context available to every [`BuiltinTool`].
pub struct ToolContext {
    /// The project's working tree root. Paths outside it are a
    /// Security Gate concern (see [`shell`]'s re-check before EXEC),
    /// not re-validated here.
    pub workspace_root: PathBuf,
    /// Shell working directory, persisted across `execute_command`
    /// invocations the way a real terminal session would.
    pub cwd: Arc<RwLock<PathBuf>>,
}

impl ToolContext {
    /// Start a context rooted at `workspace_root`, with `cwd` starting
    /// at the same place.
    #[must_use]
    pub fn new(workspace_root: PathBuf) -> Self {
        let cwd = Arc::new(RwLock::new(workspace_root.clone()));
        Self { workspace_root, cwd }
    }
}

/// Tool execution errors.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The underlying filesystem or process call failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The agent's arguments didn't satisfy the tool's input schema.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    /// The tool ran but the operation itself failed.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
    /// A referenced path does not exist.
    #[error("path not found: {0}")]
    PathNotFound(String),
    /// The tool exceeded its time budget.
    #[error("timeout after {0}ms")]
    Timeout(u64),
    /// No tool is registered under this name.
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    /// The Security Gate rejected the operation.
    #[error("denied: {0}")]
    Denied(String),
    /// The State Store rejected the operation.
    #[error("storage error: {0}")]
    Storage(#[from] arcadia_storage::StorageError),
    /// The Feature Registry rejected the operation.
    #[error("feature error: {0}")]
    Feature(#[from] arcadia_features::FeatureError),
}

/// Result type every [`BuiltinTool`] and state-backed operation returns.
pub type ToolResult = Result<String, ToolError>;

/// Registry of the in-process [`BuiltinTool`] family (file ops, shell,
/// the evidence stub). Query and lifecycle tools are dispatched
/// separately by [`ArcadiaToolExecutor`] since they need a State Store
/// handle rather than a [`ToolContext`].
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn BuiltinTool>>,
}

impl ToolRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { tools: HashMap::new() }
    }

    /// A registry with every built-in file/shell/evidence tool
    /// registered.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ReadFileTool));
        registry.register(Box::new(WriteFileTool));
        registry.register(Box::new(EditFileTool));
        registry.register(Box::new(GlobTool));
        registry.register(Box::new(GrepTool));
        registry.register(Box::new(ListDirectoryTool));
        registry.register(Box::new(ExecuteCommandTool::default()));
        registry.register(Box::new(EvidenceTool));
        registry
    }

    /// Register a tool, replacing any prior registration under the
    /// same name.
    pub fn register(&mut self, tool: Box<dyn BuiltinTool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Look a tool up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn BuiltinTool> {
        self.tools.get(name).map(AsRef::as_ref)
    }

    /// Export every registered tool as a runtime catalog entry.
    #[must_use]
    pub fn catalog(&self) -> Vec<arcadia_core::runtime::ToolCatalogEntry> {
        self.tools
            .values()
            .map(|t| arcadia_core::runtime::ToolCatalogEntry {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Truncate `output` to [`MAX_OUTPUT_CHARS`], appending a notice if it
/// had to cut anything.
#[must_use]
pub fn truncate_output(output: String) -> String {
    if output.chars().count() <= MAX_OUTPUT_CHARS {
        return output;
    }
    let mut truncated: String = output.chars().take(MAX_OUTPUT_CHARS).collect();
    truncated.push_str("\n\n... (output truncated — exceeded 30000 character limit)");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_with_defaults_has_every_builtin() {
        let registry = ToolRegistry::with_defaults();
        for name in [
            "read_file",
            "write_file",
            "edit_file",
            "glob",
            "grep",
            "list_directory",
            "execute_command",
            "record_evidence",
        ] {
            assert!(registry.get(name).is_some(), "missing {name}");
        }
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn catalog_exports_one_entry_per_tool() {
        let registry = ToolRegistry::with_defaults();
        assert_eq!(registry.catalog().len(), 8);
    }

    #[test]
    fn truncate_output_passes_short_strings_through() {
        assert_eq!(truncate_output("hi".to_string()), "hi");
    }

    #[test]
    fn truncate_output_cuts_and_annotates_long_strings() {
        let long = "x".repeat(40_000);
        let result = truncate_output(long);
        assert!(result.contains("output truncated"));
    }
}
