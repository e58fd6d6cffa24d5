//! Discord interactions endpoint.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use orbify_core::chat::discord::{
    route_interaction, DiscordSession, InboundSubmission, Interaction, InteractionOutcome,
    InteractionResponse, SIGNATURE_HEADER, TIMESTAMP_HEADER,
};
use orbify_core::pipeline::messages;

use crate::metrics::{INTERACTIONS_TOTAL, SIGNATURE_FAILURES_TOTAL};
use crate::state::AppState;

/// Delay before the intake may edit the acknowledgement, which only exists
/// once Discord has received this handler's response.
///
/// Best effort: if Discord takes longer, the first status edit fails and is
/// only logged; later edits and the result follow-up are unaffected.
const ACK_SETTLE_DELAY: Duration = Duration::from_millis(250);

pub async fn handle_interaction(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());
    let timestamp = headers.get(TIMESTAMP_HEADER).and_then(|v| v.to_str().ok());

    let (Some(signature), Some(timestamp)) = (signature, timestamp) else {
        SIGNATURE_FAILURES_TOTAL.with_label_values(&["missing"]).inc();
        return (StatusCode::UNAUTHORIZED, "missing request signature").into_response();
    };

    if let Err(e) = state.verifier().verify(signature, timestamp, &body) {
        debug!("Rejected interaction: {}", e);
        SIGNATURE_FAILURES_TOTAL.with_label_values(&["invalid"]).inc();
        return (StatusCode::UNAUTHORIZED, "invalid request signature").into_response();
    }

    let interaction: Interaction = match serde_json::from_slice(&body) {
        Ok(interaction) => interaction,
        Err(e) => {
            warn!("Malformed interaction payload: {}", e);
            return (StatusCode::BAD_REQUEST, "malformed interaction").into_response();
        }
    };

    match route_interaction(&interaction) {
        InteractionOutcome::Pong => {
            INTERACTIONS_TOTAL.with_label_values(&["ping"]).inc();
            Json(InteractionResponse::pong()).into_response()
        }
        InteractionOutcome::Reject { message, ephemeral } => {
            INTERACTIONS_TOTAL.with_label_values(&["rejected"]).inc();
            let response = if ephemeral {
                InteractionResponse::ephemeral(message)
            } else {
                InteractionResponse::message(message)
            };
            Json(response).into_response()
        }
        InteractionOutcome::Submit(submission) => {
            INTERACTIONS_TOTAL.with_label_values(&["submission"]).inc();
            spawn_intake(&state, submission);
            Json(InteractionResponse::message(messages::DOWNLOADING)).into_response()
        }
    }
}

fn spawn_intake(state: &AppState, submission: InboundSubmission) {
    info!(
        "Submission {} from user {}: {}",
        submission.submission_id,
        submission.user_id,
        submission.source.url()
    );

    let session = Arc::new(DiscordSession::new(
        state.discord().clone(),
        submission.interaction_token,
        submission.user_id,
    ));
    let intake = state.intake().clone();

    tokio::spawn(async move {
        tokio::time::sleep(ACK_SETTLE_DELAY).await;
        intake
            .handle(&submission.submission_id, submission.source, session)
            .await;
    });
}
