use axum::{extract::State, http::header, response::IntoResponse, Json};
use orbify_core::{JobSnapshot, SanitizedConfig};
use serde::Serialize;
use std::sync::Arc;

use crate::metrics::{collect_dynamic_metrics, encode_metrics};
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

#[derive(Serialize)]
pub struct QueueResponse {
    pub length: usize,
    pub jobs: Vec<JobSnapshot>,
}

/// Jobs in queue order; the first one is the active job.
pub async fn get_queue(State(state): State<Arc<AppState>>) -> Json<QueueResponse> {
    let jobs = state.orchestrator().snapshot().await;
    Json(QueueResponse {
        length: jobs.len(),
        jobs,
    })
}

/// Prometheus text exposition.
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    collect_dynamic_metrics(&state).await;
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}
