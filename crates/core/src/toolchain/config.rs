//! Configuration for the render toolchain.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Locations and limits of the external render tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolchainConfig {
    /// Path to ffmpeg binary.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// Path to ffprobe binary.
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: PathBuf,

    /// Path to blender binary.
    #[serde(default = "default_blender_path")]
    pub blender_path: PathBuf,

    /// Scene that maps the texture onto the sphere.
    #[serde(default = "default_blend_file")]
    pub blend_file: PathBuf,

    /// Script converting the rendered video into the final GIF. Invoked as
    /// `<script> <video> <prefix> <size>`; it must write
    /// `<prefix>-<size>x<size>.gif`.
    #[serde(default = "default_export_script")]
    pub export_script: PathBuf,

    /// Edge length in pixels of the exported GIF, passed to the script.
    #[serde(default = "default_export_size")]
    pub export_size: u32,

    /// Timeout for a single tool invocation in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[serde(default = "default_log_level")]
    pub ffmpeg_log_level: String,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_ffprobe_path() -> PathBuf {
    PathBuf::from("ffprobe")
}

fn default_blender_path() -> PathBuf {
    PathBuf::from("blender")
}

fn default_blend_file() -> PathBuf {
    PathBuf::from("blender-orbifier/sphere.blend")
}

fn default_export_script() -> PathBuf {
    PathBuf::from("./blender-orbifier/gif-script.sh")
}

fn default_export_size() -> u32 {
    256
}

fn default_timeout() -> u64 {
    600 // 10 minutes
}

fn default_log_level() -> String {
    "error".to_string()
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            blender_path: default_blender_path(),
            blend_file: default_blend_file(),
            export_script: default_export_script(),
            export_size: default_export_size(),
            timeout_secs: default_timeout(),
            ffmpeg_log_level: default_log_level(),
        }
    }
}

impl ToolchainConfig {
    /// Sets the ffmpeg/ffprobe paths.
    pub fn with_ffmpeg(mut self, ffmpeg_path: PathBuf, ffprobe_path: PathBuf) -> Self {
        self.ffmpeg_path = ffmpeg_path;
        self.ffprobe_path = ffprobe_path;
        self
    }

    /// Sets the blender binary and scene.
    pub fn with_blender(mut self, blender_path: PathBuf, blend_file: PathBuf) -> Self {
        self.blender_path = blender_path;
        self.blend_file = blend_file;
        self
    }

    /// Sets the export script.
    pub fn with_export_script(mut self, script: PathBuf) -> Self {
        self.export_script = script;
        self
    }

    /// Sets the timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// File name suffix the export script appends to its output prefix.
    pub fn artifact_suffix(&self) -> String {
        format!("-{}x{}.gif", self.export_size, self.export_size)
    }
}
