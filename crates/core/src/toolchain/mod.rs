//! Render toolchain.
//!
//! This module provides the `Toolchain` trait and a process-backed
//! implementation driving the external programs that make an orb:
//!
//! - `ffprobe` to check that a download actually contains pixels
//! - `ffmpeg` to turn animated rasters into something blender can texture
//! - `blender` to render the spinning sphere
//! - the export script to turn the render into a GIF
//!
//! # Example
//!
//! ```ignore
//! use orbify_core::toolchain::{ProcessToolchain, Toolchain, ToolchainConfig};
//!
//! let toolchain = ProcessToolchain::new(ToolchainConfig::default());
//! toolchain.validate().await?;
//!
//! toolchain.render(Path::new("orb-input.png"), Path::new("orb.mp4")).await?;
//! let gif = toolchain.export(Path::new("orb.mp4"), Path::new("orb")).await?;
//! ```

mod config;
mod error;
mod process;
mod traits;
mod types;

pub use config::ToolchainConfig;
pub use error::ToolchainError;
pub use process::ProcessToolchain;
pub use traits::{needs_normalization, Toolchain, UNSUPPORTED_ANIMATED_EXTENSIONS};
pub use types::{Tool, ToolOutput};
