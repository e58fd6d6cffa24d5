//! FIFO queue of pending submissions.

use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::debug;

use super::types::{Job, JobSnapshot, JobStatus, QueueAdvanced, QueueError};

/// Ordered list of pending jobs plus the wakers of the jobs waiting for
/// their turn.
///
/// Position 0 is the only job allowed to run. Every job waiting behind it
/// may register one subscriber, which receives its new position each time a
/// job ahead of it completes.
#[derive(Debug, Default)]
pub struct SubmissionQueue {
    jobs: Vec<Job>,
    waiters: HashMap<String, mpsc::UnboundedSender<QueueAdvanced>>,
}

impl SubmissionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a job at the tail and returns its position.
    ///
    /// The job is stored as `Queued` regardless of the state it arrived in.
    pub fn enqueue(&mut self, mut job: Job) -> Result<usize, QueueError> {
        if self.position_of(&job.id).is_some() {
            return Err(QueueError::DuplicateSubmission(job.id));
        }
        job.status = JobStatus::Queued;
        self.jobs.push(job);
        Ok(self.jobs.len() - 1)
    }

    /// Zero-based position of the job, or `None` if it is not queued.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.jobs.iter().position(|job| job.id == id)
    }

    /// Removes the job with this id. Removing an absent id is a no-op.
    pub fn remove(&mut self, id: &str) {
        if let Some(index) = self.position_of(id) {
            self.jobs.remove(index);
        }
        self.waiters.remove(id);
    }

    /// Removes the job and tells every remaining waiter its new position.
    ///
    /// Waiters that reach the head are deregistered here, so each one sees
    /// position 0 exactly once.
    pub fn complete(&mut self, id: &str) {
        self.remove(id);

        let jobs = &self.jobs;
        self.waiters.retain(|waiter_id, tx| {
            let Some(position) = jobs.iter().position(|job| &job.id == waiter_id) else {
                return false;
            };
            if tx.send(QueueAdvanced { position }).is_err() {
                debug!("Dropping closed queue subscriber for {}", waiter_id);
                return false;
            }
            position > 0
        });
    }

    /// Registers the waker for a queued job, replacing any previous one.
    pub fn subscribe(
        &mut self,
        id: &str,
    ) -> Result<mpsc::UnboundedReceiver<QueueAdvanced>, QueueError> {
        if self.position_of(id).is_none() {
            return Err(QueueError::NotFound(id.to_string()));
        }
        let (tx, rx) = mpsc::unbounded_channel();
        self.waiters.insert(id.to_string(), tx);
        Ok(rx)
    }

    /// Whether a waker is registered for this job.
    pub fn is_subscribed(&self, id: &str) -> bool {
        self.waiters.contains_key(id)
    }

    /// Updates a job's status.
    ///
    /// Only the head may move to a state other than `Queued`, which keeps at
    /// most one job active at any time.
    pub fn set_status(&mut self, id: &str, status: JobStatus) -> Result<(), QueueError> {
        let position = self
            .position_of(id)
            .ok_or_else(|| QueueError::NotFound(id.to_string()))?;
        if position != 0 && status != JobStatus::Queued {
            return Err(QueueError::NotHead {
                id: id.to_string(),
                position,
            });
        }
        self.jobs[position].status = status;
        Ok(())
    }

    /// Returns a copy of the queued job.
    pub fn get(&self, id: &str) -> Option<Job> {
        self.jobs.iter().find(|job| job.id == id).cloned()
    }

    /// Number of pending jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Number of jobs currently outside the `Queued` state.
    pub fn active_count(&self) -> usize {
        self.jobs
            .iter()
            .filter(|job| job.status != JobStatus::Queued)
            .count()
    }

    /// Ordered view of the queue.
    pub fn snapshot(&self) -> Vec<JobSnapshot> {
        self.jobs
            .iter()
            .enumerate()
            .map(|(position, job)| JobSnapshot {
                id: job.id.clone(),
                position,
                status: job.status,
                source_path: job.source_path.clone(),
                enqueued_at: job.enqueued_at,
            })
            .collect()
    }
}
