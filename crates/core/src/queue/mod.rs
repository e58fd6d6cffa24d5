//! Submission queue.
//!
//! A strict FIFO of pending jobs. Only the head of the queue is eligible to
//! run; jobs behind it subscribe to "queue advanced" signals and are woken
//! synchronously whenever a job ahead of them completes.

mod submission_queue;
mod types;

pub use submission_queue::SubmissionQueue;
pub use types::{Job, JobSnapshot, JobStatus, QueueAdvanced, QueueError};
