//! Error types for the toolchain module.

use std::path::PathBuf;
use thiserror::Error;

use super::types::Tool;

/// Errors that can occur while running an external tool.
#[derive(Debug, Error)]
pub enum ToolchainError {
    /// Tool binary not found.
    #[error("{tool} not found at path: {path}")]
    ToolNotFound { tool: Tool, path: PathBuf },

    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// The tool exited unsuccessfully.
    #[error("{tool} exited with code {code:?}")]
    ToolFailed {
        tool: Tool,
        code: Option<i32>,
        stderr: Option<String>,
    },

    /// The tool did not finish in time.
    #[error("{tool} timed out after {timeout_secs} seconds")]
    Timeout { tool: Tool, timeout_secs: u64 },

    /// The tool succeeded but did not produce its output.
    #[error("{tool} did not produce {path}")]
    OutputMissing { tool: Tool, path: PathBuf },

    /// I/O error while running the tool.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolchainError {
    /// Creates a tool failure from captured stderr.
    pub fn tool_failed(tool: Tool, code: Option<i32>, stderr: &str) -> Self {
        let stderr = stderr.trim();
        Self::ToolFailed {
            tool,
            code,
            stderr: if stderr.is_empty() {
                None
            } else {
                Some(stderr.to_string())
            },
        }
    }

    /// The tool this error originated from, when known.
    pub fn tool(&self) -> Option<Tool> {
        match self {
            Self::ToolNotFound { tool, .. }
            | Self::ToolFailed { tool, .. }
            | Self::Timeout { tool, .. }
            | Self::OutputMissing { tool, .. } => Some(*tool),
            Self::InputNotFound { .. } | Self::Io(_) => None,
        }
    }
}
