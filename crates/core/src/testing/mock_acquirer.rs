//! Mock acquirer for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};

use crate::acquisition::{AcquiredSource, AcquisitionError, InputSource, SourceAcquirer};
use crate::workspace::JobWorkspace;

/// How the next acquisitions should end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcquireBehavior {
    #[default]
    Succeed,
    NotGraphical,
    DownloadFails,
}

/// Mock implementation of the SourceAcquirer trait.
///
/// Writes a small placeholder into the job directory instead of
/// downloading anything.
#[derive(Debug, Clone)]
pub struct MockAcquirer {
    workspace: JobWorkspace,
    behavior: Arc<RwLock<AcquireBehavior>>,
    acquired: Arc<RwLock<Vec<String>>>,
    /// `true` while acquisitions may finish.
    gate: Arc<watch::Sender<bool>>,
}

impl MockAcquirer {
    pub fn new(workspace: JobWorkspace) -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            workspace,
            behavior: Arc::new(RwLock::new(AcquireBehavior::default())),
            acquired: Arc::new(RwLock::new(Vec::new())),
            gate: Arc::new(gate),
        }
    }

    /// Hold acquisitions after their source is written until `resume`.
    pub fn pause(&self) {
        self.gate.send_replace(false);
    }

    /// Release held acquisitions.
    pub fn resume(&self) {
        self.gate.send_replace(true);
    }

    /// Set how later acquisitions end.
    pub async fn set_behavior(&self, behavior: AcquireBehavior) {
        *self.behavior.write().await = behavior;
    }

    /// Submission ids passed to `acquire`, in order.
    pub async fn acquired_ids(&self) -> Vec<String> {
        self.acquired.read().await.clone()
    }
}

#[async_trait]
impl SourceAcquirer for MockAcquirer {
    async fn acquire(
        &self,
        submission_id: &str,
        source: &InputSource,
    ) -> Result<AcquiredSource, AcquisitionError> {
        self.acquired.write().await.push(submission_id.to_string());

        let behavior = *self.behavior.read().await;
        if behavior == AcquireBehavior::DownloadFails {
            return Err(AcquisitionError::Status {
                url: source.url().to_string(),
                status: 404,
            });
        }

        self.workspace.create(submission_id).await?;
        let path = self
            .workspace
            .input_path(submission_id, &source.extension());
        tokio::fs::write(&path, b"mock-source").await?;

        let mut gate = self.gate.subscribe();
        let _ = gate.wait_for(|open| *open).await;

        if behavior == AcquireBehavior::NotGraphical {
            return Err(AcquisitionError::NotGraphical {
                kind: "audio".to_string(),
            });
        }

        Ok(AcquiredSource {
            path,
            size_bytes: 11,
            kind: "video".to_string(),
        })
    }
}
