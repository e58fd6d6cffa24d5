//! Pipeline orchestrator.
//!
//! Admits acquired jobs into the submission queue and runs the render
//! pipeline for whichever job is at the head:
//! - Normalize: transcode animated rasters the renderer cannot texture
//! - Render: blender draws the spinning sphere
//! - Export: the render becomes a GIF
//! - Deliver: the GIF is posted back to the submitter
//!
//! Only the head runs. Every other job waits on its queue subscription and
//! is woken when a job ahead of it completes.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

use crate::chat::ChatSession;
use crate::config::WorkspaceConfig;
use crate::metrics::{JOBS_FINISHED_TOTAL, QUEUE_DEPTH, STEP_DURATION};
use crate::queue::{Job, JobSnapshot, JobStatus, QueueAdvanced, QueueError, SubmissionQueue};
use crate::toolchain::{needs_normalization, Toolchain};
use crate::workspace::JobWorkspace;

use super::error::PipelineError;
use super::messages;

/// Serializes renders through a FIFO queue.
#[derive(Clone)]
pub struct PipelineOrchestrator {
    toolchain: Arc<dyn Toolchain>,
    queue: Arc<Mutex<SubmissionQueue>>,
    workspace: JobWorkspace,
    retain_failed: bool,
}

impl PipelineOrchestrator {
    pub fn new(toolchain: Arc<dyn Toolchain>, workspace: &WorkspaceConfig) -> Self {
        Self {
            toolchain,
            queue: Arc::new(Mutex::new(SubmissionQueue::new())),
            workspace: JobWorkspace::new(&workspace.root),
            retain_failed: workspace.retain_failed,
        }
    }

    pub fn toolchain(&self) -> Arc<dyn Toolchain> {
        Arc::clone(&self.toolchain)
    }

    pub fn workspace(&self) -> &JobWorkspace {
        &self.workspace
    }

    /// Admits a job and returns its queue position.
    ///
    /// Position 0 starts right away; any other position waits for its turn.
    /// The pipeline itself runs on a spawned task.
    pub async fn submit(&self, job: Job) -> Result<usize, QueueError> {
        let id = job.id.clone();
        let submitter = Arc::clone(&job.submitter);

        let (position, waiter) = {
            let mut queue = self.queue.lock().await;
            let position = queue.enqueue(job)?;
            let waiter = if position > 0 {
                match queue.subscribe(&id) {
                    Ok(rx) => Some(rx),
                    Err(e) => {
                        queue.remove(&id);
                        return Err(e);
                    }
                }
            } else {
                None
            };
            QUEUE_DEPTH.set(queue.len() as i64);
            (position, waiter)
        };

        info!("Job {} admitted at queue position {}", id, position);

        let this = self.clone();
        tokio::spawn(async move {
            this.drive(id, submitter, position, waiter).await;
        });

        Ok(position)
    }

    pub async fn position_of(&self, id: &str) -> Option<usize> {
        self.queue.lock().await.position_of(id)
    }

    pub async fn queue_len(&self) -> usize {
        self.queue.lock().await.len()
    }

    /// Ordered view of the queue.
    pub async fn snapshot(&self) -> Vec<JobSnapshot> {
        self.queue.lock().await.snapshot()
    }

    /// Waits for the job's turn, then runs it.
    async fn drive(
        self,
        id: String,
        submitter: Arc<dyn ChatSession>,
        position: usize,
        waiter: Option<mpsc::UnboundedReceiver<QueueAdvanced>>,
    ) {
        if let Some(mut rx) = waiter {
            self.report(&id, &submitter, &messages::queue_wait(position))
                .await;

            loop {
                match rx.recv().await {
                    Some(QueueAdvanced { position: 0 }) => break,
                    Some(QueueAdvanced { position }) => {
                        debug!("Job {} advanced to position {}", id, position);
                        self.report(&id, &submitter, &messages::queue_advanced(position))
                            .await;
                    }
                    None => {
                        warn!("Queue subscription for job {} closed before its turn", id);
                        return;
                    }
                }
            }
        }

        self.run(&id, &submitter).await;
    }

    /// Runs the head job to a terminal state and promotes the next one.
    async fn run(&self, id: &str, submitter: &Arc<dyn ChatSession>) {
        let started = Instant::now();
        let source = self
            .queue
            .lock()
            .await
            .get(id)
            .and_then(|job| job.source_path);

        info!("Job {} started", id);

        let status = match self.execute(id, submitter, source).await {
            Ok(()) => {
                info!("Job {} completed in {:?}", id, started.elapsed());
                JobStatus::Completed
            }
            Err(e) => {
                error!("Job {} failed during {}: {}", id, e.step(), e);
                self.report(id, submitter, messages::PIPELINE_FAILED).await;
                JobStatus::Failed
            }
        };

        if status == JobStatus::Failed && self.retain_failed {
            info!(
                "Keeping job directory {} for inspection",
                self.workspace.job_dir(id).display()
            );
        } else if let Err(e) = self.workspace.remove(id).await {
            warn!("Failed to remove job directory for {}: {}", id, e);
        }

        {
            let mut queue = self.queue.lock().await;
            if let Err(e) = queue.set_status(id, status) {
                warn!("Failed to mark job {} as {}: {}", id, status, e);
            }
            queue.complete(id);
            QUEUE_DEPTH.set(queue.len() as i64);
        }

        JOBS_FINISHED_TOTAL
            .with_label_values(&[status.as_str()])
            .inc();
    }

    async fn execute(
        &self,
        id: &str,
        submitter: &Arc<dyn ChatSession>,
        source: Option<PathBuf>,
    ) -> Result<(), PipelineError> {
        let mut input = source.ok_or_else(|| PipelineError::MissingSource(id.to_string()))?;

        if needs_normalization(&input) {
            self.enter(id, submitter, JobStatus::Converting, messages::CONVERTING)
                .await?;
            let normalized = self.workspace.normalized_path(id);
            timed("normalize", self.toolchain.transcode(&input, &normalized))
                .await
                .map_err(PipelineError::Normalize)?;
            input = normalized;
        }

        self.enter(id, submitter, JobStatus::Rendering, messages::RENDERING)
            .await?;
        let rendered = self.workspace.render_path(id);
        timed("render", self.toolchain.render(&input, &rendered))
            .await
            .map_err(PipelineError::Render)?;

        self.enter(id, submitter, JobStatus::Exporting, messages::EXPORTING)
            .await?;
        let artifact = timed(
            "export",
            self.toolchain
                .export(&rendered, &self.workspace.export_prefix(id)),
        )
        .await
        .map_err(PipelineError::Export)?;

        self.enter(id, submitter, JobStatus::Uploading, messages::UPLOADING)
            .await?;
        timed("deliver", self.deliver(id, submitter, artifact)).await
    }

    async fn deliver(
        &self,
        id: &str,
        submitter: &Arc<dyn ChatSession>,
        artifact: PathBuf,
    ) -> Result<(), PipelineError> {
        let bytes = tokio::fs::read(&artifact)
            .await
            .map_err(PipelineError::ArtifactUnreadable)?;
        debug!("Posting {} bytes for job {}", bytes.len(), id);

        submitter
            .post_result(
                &messages::result(&submitter.mention()),
                bytes,
                messages::RESULT_FILE_NAME,
            )
            .await
            .map_err(PipelineError::Delivery)?;

        if let Err(e) = submitter.retract_ack().await {
            warn!("Failed to retract acknowledgement for job {}: {}", id, e);
        }
        Ok(())
    }

    /// Moves the job into a pipeline step and tells the submitter.
    async fn enter(
        &self,
        id: &str,
        submitter: &Arc<dyn ChatSession>,
        status: JobStatus,
        text: &str,
    ) -> Result<(), PipelineError> {
        self.queue.lock().await.set_status(id, status)?;
        debug!("Job {} is {}", id, status);
        self.report(id, submitter, text).await;
        Ok(())
    }

    /// Status updates never stop the pipeline.
    async fn report(&self, id: &str, submitter: &Arc<dyn ChatSession>, text: &str) {
        if let Err(e) = submitter.update_status(text).await {
            warn!("Failed to update status for job {}: {}", id, e);
        }
    }
}

/// Runs a step, recording its duration when it succeeds.
async fn timed<F, T, E>(step: &str, future: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    let started = Instant::now();
    let result = future.await;
    if result.is_ok() {
        STEP_DURATION
            .with_label_values(&[step])
            .observe(started.elapsed().as_secs_f64());
    }
    result
}
