//! Error types for source acquisition.

use thiserror::Error;

use crate::toolchain::ToolchainError;

/// Reply when the download holds no pixels.
pub const NOT_GRAPHICAL_MESSAGE: &str = "The file you provided is not an image, gif, or video.";

/// Reply for every other acquisition failure.
pub const ACQUISITION_FAILED_MESSAGE: &str = "An error occurred while processing your orb.";

/// Errors that keep a submission out of the queue.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// The request failed or its body could not be read.
    #[error("download failed: {0}")]
    Download(#[from] reqwest::Error),

    /// The source server answered with a non-success status.
    #[error("download of {url} failed with status {status}")]
    Status { url: String, status: u16 },

    /// Writing the source into the job directory failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The probe found no video stream.
    #[error("source is not graphical (probe reported {kind:?})")]
    NotGraphical { kind: String },

    /// The probe itself could not run.
    #[error("probe failed: {0}")]
    Probe(#[source] ToolchainError),
}

impl AcquisitionError {
    /// Text shown to the submitter.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotGraphical { .. } => NOT_GRAPHICAL_MESSAGE,
            _ => ACQUISITION_FAILED_MESSAGE,
        }
    }

    /// Label for the submissions metric.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::NotGraphical { .. } => "not_graphical",
            _ => "acquisition_failed",
        }
    }
}
