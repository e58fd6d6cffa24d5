//! Trait definitions for the toolchain module.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::error::ToolchainError;

/// The external programs that turn a source image into an orb.
///
/// Every call is a blocking external process from the caller's point of
/// view; implementations must not run two renders against the same job
/// directory at once, which the orchestrator guarantees.
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Returns the name of this toolchain implementation.
    fn name(&self) -> &str;

    /// Returns the short type token of the first video stream
    /// (`video` for anything with pixels).
    async fn detect_type(&self, path: &Path) -> Result<String, ToolchainError>;

    /// Transcodes an animated raster into a container the renderer reads.
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), ToolchainError>;

    /// Renders the textured sphere into an intermediate video.
    async fn render(&self, input: &Path, output: &Path) -> Result<(), ToolchainError>;

    /// Exports the rendered video; returns the path of the final artifact.
    async fn export(&self, input: &Path, output_prefix: &Path)
        -> Result<PathBuf, ToolchainError>;

    /// Validates that the tools are installed.
    async fn validate(&self) -> Result<(), ToolchainError> {
        Ok(())
    }
}

/// Extensions of animated rasters the renderer cannot use as a texture.
pub const UNSUPPORTED_ANIMATED_EXTENSIONS: &[&str] = &["gif", "apng"];

/// Whether a source must be transcoded before rendering.
pub fn needs_normalization(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            UNSUPPORTED_ANIMATED_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_normalization() {
        assert!(needs_normalization(Path::new("/tmp/orbs/1/orb-input.gif")));
        assert!(needs_normalization(Path::new("/tmp/orbs/1/orb-input.GIF")));
        assert!(needs_normalization(Path::new("/tmp/orbs/1/orb-input.apng")));
        assert!(!needs_normalization(Path::new("/tmp/orbs/1/orb-input.png")));
        assert!(!needs_normalization(Path::new("/tmp/orbs/1/orb-input.mp4")));
        assert!(!needs_normalization(Path::new("/tmp/orbs/1/orb-input")));
    }
}
