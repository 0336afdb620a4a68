//! The primitive tool invocations the Security Gate evaluates.
//!
//! This is deliberately narrower than a full tool-call payload: the gate
//! only needs enough shape to apply hard boundaries. Risk scoring over the
//! same invocation is a separate concern downstream.

use serde::{Deserialize, Serialize};

/// A tool invocation reduced to the shape the Security Gate checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ToolAction {
    /// Running a shell command with arguments.
    ExecuteCommand {
        /// The command name (e.g. `"rm"`).
        command: String,
        /// The command's arguments.
        args: Vec<String>,
    },
    /// Reading a file.
    FileRead {
        /// The path being read.
        path: String,
    },
    /// Writing a file.
    FileWrite {
        /// The path being written.
        path: String,
    },
    /// Deleting a file.
    FileDelete {
        /// The path being deleted.
        path: String,
    },
    /// Making an outbound network connection.
    NetworkRequest {
        /// The destination host.
        host: String,
        /// The destination port.
        port: u16,
    },
}
