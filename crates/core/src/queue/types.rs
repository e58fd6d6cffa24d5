//! Types for the submission queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::chat::ChatSession;

/// Errors returned by queue operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    /// A job with the same id is already queued.
    #[error("submission already queued: {0}")]
    DuplicateSubmission(String),

    /// No queued job has this id.
    #[error("submission not found: {0}")]
    NotFound(String),

    /// Only the head of the queue may leave the `Queued` state.
    #[error("submission {id} is at position {position}, only the head may run")]
    NotHead { id: String, position: usize },
}

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Waiting for its turn.
    Queued,
    /// Source is being fetched (before admission).
    Downloading,
    /// Source is being normalized for the renderer.
    Converting,
    /// The 3-D render is running.
    Rendering,
    /// The render is being exported to the final format.
    Exporting,
    /// The artifact is being posted back to the submitter.
    Uploading,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Downloading => "downloading",
            JobStatus::Converting => "converting",
            JobStatus::Rendering => "rendering",
            JobStatus::Exporting => "exporting",
            JobStatus::Uploading => "uploading",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Whether the job has reached a final state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single submission travelling through the queue.
#[derive(Clone)]
pub struct Job {
    /// Submission id supplied by the inbound event.
    pub id: String,
    /// Handle used to report back to the submitter.
    pub submitter: Arc<dyn ChatSession>,
    /// Location of the acquired source, once known.
    pub source_path: Option<PathBuf>,
    pub status: JobStatus,
    pub enqueued_at: DateTime<Utc>,
}

impl Job {
    /// Creates a job whose source is still being acquired.
    pub fn new(id: impl Into<String>, submitter: Arc<dyn ChatSession>) -> Self {
        Self {
            id: id.into(),
            submitter,
            source_path: None,
            status: JobStatus::Downloading,
            enqueued_at: Utc::now(),
        }
    }

    /// Attaches the acquired source; the job is ready to be queued.
    pub fn with_source(mut self, path: PathBuf) -> Self {
        self.source_path = Some(path);
        self.status = JobStatus::Queued;
        self
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("id", &self.id)
            .field("source_path", &self.source_path)
            .field("status", &self.status)
            .field("enqueued_at", &self.enqueued_at)
            .finish_non_exhaustive()
    }
}

/// Signal pushed to a waiting job when a job ahead of it leaves the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueAdvanced {
    /// The waiter's position after the removal.
    pub position: usize,
}

/// Serializable view of a queued job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub id: String,
    pub position: usize,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
    pub enqueued_at: DateTime<Utc>,
}
