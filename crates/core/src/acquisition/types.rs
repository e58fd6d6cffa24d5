//! Types for source acquisition.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Extension used when a source name carries none.
pub const FALLBACK_EXTENSION: &str = "bin";

/// Where a submission's image comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputSource {
    /// A file uploaded to the chat platform.
    Attachment { url: String, filename: String },
    /// An arbitrary URL given by the submitter.
    Url { url: String },
    /// A resolved avatar image.
    Avatar { url: String, animated: bool },
}

impl InputSource {
    /// URL the source is downloaded from.
    pub fn url(&self) -> &str {
        match self {
            InputSource::Attachment { url, .. }
            | InputSource::Url { url }
            | InputSource::Avatar { url, .. } => url,
        }
    }

    /// Lowercased file extension used for the downloaded input.
    pub fn extension(&self) -> String {
        let raw = match self {
            InputSource::Attachment { filename, .. } => extension_of(filename),
            InputSource::Url { url } => Url::parse(url).ok().and_then(|u| {
                u.path_segments()
                    .and_then(|mut segments| segments.next_back().map(str::to_string))
                    .and_then(|segment| extension_of(&segment))
            }),
            InputSource::Avatar { animated, .. } => {
                Some(if *animated { "gif" } else { "png" }.to_string())
            }
        };

        raw.filter(|e| is_safe_extension(e))
            .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
    }
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn is_safe_extension(ext: &str) -> bool {
    !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric())
}

/// A source stored in the job's workspace and confirmed to hold pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquiredSource {
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Type token reported by the probe.
    pub kind: String,
}
