//! Tool invocation classification.
//!
//! [`ToolInvocation`] categorizes the actions the Risk Classifier scores.
//! Each variant captures the context needed to assign a default risk
//! level and to render the invocation for pattern matching against a
//! [`crate::RiskPattern`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// A tool invocation as seen by the Risk Classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ToolInvocation {
    /// Read a file or search the filesystem.
    FileRead {
        /// Path or pattern being read/searched.
        path: String,
    },

    /// Write a file.
    FileWrite {
        /// Path to the file being written.
        path: String,
    },

    /// Delete a file.
    FileDelete {
        /// Path to the file being deleted.
        path: String,
    },

    /// Execute a shell command.
    ExecuteCommand {
        /// The command to execute.
        command: String,
        /// Command arguments.
        args: Vec<String>,
    },

    /// Make a network request.
    NetworkRequest {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// Transmit data to an external destination.
    TransmitData {
        /// Where the data is being sent.
        destination: String,
        /// Type/classification of the data.
        data_type: String,
    },

    /// Call a registered tool by name with a rendered argument string,
    /// for tools the classifier has no dedicated variant for.
    Named {
        /// The tool's registered name.
        name: String,
        /// A rendered, human-readable form of its arguments.
        rendered_args: String,
    },
}

impl ToolInvocation {
    /// A short label for the invocation's kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FileRead { .. } => "file_read",
            Self::FileWrite { .. } => "file_write",
            Self::FileDelete { .. } => "file_delete",
            Self::ExecuteCommand { .. } => "execute_command",
            Self::NetworkRequest { .. } => "network_request",
            Self::TransmitData { .. } => "transmit_data",
            Self::Named { .. } => "named",
        }
    }

    /// Render the invocation to the flat string a [`crate::RiskPattern`]
    /// is matched against, e.g. `"rm -rf /tmp/build"` or
    /// `"network_request api.example.com:443"`.
    #[must_use]
    pub fn rendered(&self) -> String {
        match self {
            Self::FileRead { path } | Self::FileWrite { path } | Self::FileDelete { path } => {
                path.clone()
            },
            Self::ExecuteCommand { command, args } => {
                if args.is_empty() {
                    command.clone()
                } else {
                    format!("{command} {}", args.join(" "))
                }
            },
            Self::NetworkRequest { host, port } => format!("{host}:{port}"),
            Self::TransmitData { destination, .. } => destination.clone(),
            Self::Named { name, rendered_args } => {
                if rendered_args.is_empty() {
                    name.clone()
                } else {
                    format!("{name} {rendered_args}")
                }
            },
        }
    }

    /// Whether the invocation is a write in the sense that matters to the
    /// Autonomy Manager's minimum-level table (§4.5): anything that isn't
    /// a pure read.
    #[must_use]
    pub fn is_write(&self) -> bool {
        !matches!(self, Self::FileRead { .. })
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind(), self.rendered())
    }
}
