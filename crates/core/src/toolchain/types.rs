//! Types for the toolchain module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::process::ExitStatus;

/// The external programs the pipeline drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Type sniffing (ffprobe).
    Probe,
    /// Format normalization (ffmpeg).
    Transcode,
    /// 3-D render (blender).
    Render,
    /// Animated-image export (gif script).
    Export,
}

impl Tool {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Probe => "probe",
            Tool::Transcode => "transcode",
            Tool::Render => "render",
            Tool::Export => "export",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Captured result of a finished tool process.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}
