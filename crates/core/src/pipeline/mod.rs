//! Render pipeline.
//!
//! `PipelineOrchestrator` owns the submission queue and drives the head
//! job through normalize, render, export and delivery.
//! `SubmissionIntake` sits in front of it and turns inbound submissions
//! into acquired, queueable jobs.

mod error;
mod intake;
pub mod messages;
mod orchestrator;

pub use error::PipelineError;
pub use intake::{IntakeOutcome, SubmissionIntake};
pub use orchestrator::PipelineOrchestrator;
