//! Submission intake.
//!
//! Runs acquisition for a freshly acknowledged submission and hands the
//! result to the orchestrator. Several intakes may run at once; each only
//! touches its own job directory.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

use crate::acquisition::{InputSource, SourceAcquirer};
use crate::chat::ChatSession;
use crate::metrics::SUBMISSIONS_TOTAL;
use crate::queue::Job;

use super::messages;
use super::orchestrator::PipelineOrchestrator;

/// What became of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    /// Admitted at this queue position.
    Queued { position: usize },
    /// Never entered the queue; the submitter has been told why.
    Rejected { reason: String },
}

/// Ids whose acquisition is under way.
type InFlight = Arc<Mutex<HashSet<String>>>;

/// Holds an id in the in-flight set until dropped.
struct Reservation {
    in_flight: InFlight,
    id: String,
}

impl Drop for Reservation {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

/// Acquires sources and admits them into the queue.
#[derive(Clone)]
pub struct SubmissionIntake {
    acquirer: Arc<dyn SourceAcquirer>,
    orchestrator: PipelineOrchestrator,
    in_flight: InFlight,
}

impl SubmissionIntake {
    pub fn new(acquirer: Arc<dyn SourceAcquirer>, orchestrator: PipelineOrchestrator) -> Self {
        Self {
            acquirer,
            orchestrator,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn orchestrator(&self) -> &PipelineOrchestrator {
        &self.orchestrator
    }

    /// Acquires the source and submits the job.
    ///
    /// The submitter's acknowledgement must already be posted.
    pub async fn handle(
        &self,
        submission_id: &str,
        source: InputSource,
        submitter: Arc<dyn ChatSession>,
    ) -> IntakeOutcome {
        // The job directory is keyed by id; a live job owns it.
        let Some(_reservation) = self.reserve(submission_id).await else {
            warn!("Submission {} is already in progress", submission_id);
            return self
                .reject(submission_id, &submitter, messages::PIPELINE_FAILED, "rejected", false)
                .await;
        };

        let acquired = match self.acquirer.acquire(submission_id, &source).await {
            Ok(acquired) => acquired,
            Err(e) => {
                warn!("Acquisition for {} failed: {}", submission_id, e);
                return self
                    .reject(submission_id, &submitter, e.user_message(), e.outcome(), true)
                    .await;
            }
        };

        let job = Job::new(submission_id, Arc::clone(&submitter)).with_source(acquired.path);
        match self.orchestrator.submit(job).await {
            Ok(position) => {
                SUBMISSIONS_TOTAL.with_label_values(&["queued"]).inc();
                info!("Submission {} queued at position {}", submission_id, position);
                IntakeOutcome::Queued { position }
            }
            Err(e) => {
                warn!("Submission {} not admitted: {}", submission_id, e);
                self.reject(submission_id, &submitter, messages::PIPELINE_FAILED, "rejected", false)
                    .await
            }
        }
    }

    /// Claims the id for this intake. Fails while another intake holds it
    /// or a job with that id is queued. The claim is taken before the queue
    /// check and held until the job is submitted, so the two never miss
    /// each other.
    async fn reserve(&self, submission_id: &str) -> Option<Reservation> {
        let claimed = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(submission_id.to_string());
        if !claimed {
            return None;
        }

        let reservation = Reservation {
            in_flight: Arc::clone(&self.in_flight),
            id: submission_id.to_string(),
        };
        if self.orchestrator.position_of(submission_id).await.is_some() {
            return None;
        }
        Some(reservation)
    }

    async fn reject(
        &self,
        submission_id: &str,
        submitter: &Arc<dyn ChatSession>,
        message: &str,
        outcome: &str,
        remove_dir: bool,
    ) -> IntakeOutcome {
        SUBMISSIONS_TOTAL.with_label_values(&[outcome]).inc();

        if let Err(e) = submitter.update_status(message).await {
            warn!("Failed to report rejection of {}: {}", submission_id, e);
        }

        if remove_dir {
            if let Err(e) = self.orchestrator.workspace().remove(submission_id).await {
                warn!("Failed to remove job directory for {}: {}", submission_id, e);
            }
        }

        IntakeOutcome::Rejected {
            reason: message.to_string(),
        }
    }
}
