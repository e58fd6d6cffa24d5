//! Error types for the render pipeline.

use thiserror::Error;

use crate::chat::ChatError;
use crate::queue::QueueError;
use crate::toolchain::ToolchainError;

/// Why a job's pipeline stopped. Never shown to the submitter verbatim.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The queued job carries no source file.
    #[error("job {0} has no source file")]
    MissingSource(String),

    #[error("normalize failed: {0}")]
    Normalize(#[source] ToolchainError),

    #[error("render failed: {0}")]
    Render(#[source] ToolchainError),

    #[error("export failed: {0}")]
    Export(#[source] ToolchainError),

    /// The exported artifact could not be read back.
    #[error("artifact unreadable: {0}")]
    ArtifactUnreadable(#[source] std::io::Error),

    /// Posting the result failed.
    #[error("delivery failed: {0}")]
    Delivery(#[source] ChatError),

    #[error("queue error: {0}")]
    Queue(#[from] QueueError),
}

impl PipelineError {
    /// Step label used in logs and metrics.
    pub fn step(&self) -> &'static str {
        match self {
            Self::MissingSource(_) | Self::Queue(_) => "admission",
            Self::Normalize(_) => "normalize",
            Self::Render(_) => "render",
            Self::Export(_) => "export",
            Self::ArtifactUnreadable(_) | Self::Delivery(_) => "deliver",
        }
    }
}
