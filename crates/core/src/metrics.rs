//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Submissions (acquisition outcome)
//! - The render queue (depth, finished jobs)
//! - Pipeline steps (duration per step)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Submission Metrics
// =============================================================================

/// Submissions by acquisition outcome.
pub static SUBMISSIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("orbify_submissions_total", "Total submissions received"),
        &["outcome"], // "queued", "not_graphical", "acquisition_failed", "rejected"
    )
    .unwrap()
});

// =============================================================================
// Queue Metrics
// =============================================================================

/// Jobs currently in the queue, the active one included.
pub static QUEUE_DEPTH: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("orbify_queue_depth", "Number of jobs in the render queue").unwrap()
});

/// Jobs that left the queue, by outcome.
pub static JOBS_FINISHED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("orbify_jobs_finished_total", "Total jobs that left the queue"),
        &["outcome"], // "completed", "failed"
    )
    .unwrap()
});

// =============================================================================
// Pipeline Metrics
// =============================================================================

/// Duration of each pipeline step in seconds.
pub static STEP_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "orbify_step_duration_seconds",
            "Duration of pipeline steps",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0, 600.0]),
        &["step"], // "normalize", "render", "export", "deliver"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(SUBMISSIONS_TOTAL.clone()),
        Box::new(QUEUE_DEPTH.clone()),
        Box::new(JOBS_FINISHED_TOTAL.clone()),
        Box::new(STEP_DURATION.clone()),
    ]
}
