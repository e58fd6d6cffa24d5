//! Error types for chat platform calls.

use thiserror::Error;

/// Errors returned by outbound chat platform calls.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The HTTP request could not be sent or its body read.
    #[error("chat request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The platform answered with a non-success status.
    #[error("{operation} failed with status {status}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// Still rate limited after the allowed number of attempts.
    #[error("{operation} still rate limited after {attempts} attempts")]
    RateLimited {
        operation: &'static str,
        attempts: u32,
    },

    /// Any other failure.
    #[error("{0}")]
    Other(String),
}

impl ChatError {
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
