//! Common test utilities for in-process server tests.
//!
//! The fixture builds the real router around mock collaborators and a
//! fixed signing key, so tests can send signed interactions without
//! Discord, ffmpeg or blender.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use ed25519_dalek::{Signer, SigningKey};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use orbify_core::chat::discord::{DiscordClient, SignatureVerifier};
use orbify_core::testing::{MockAcquirer, MockToolchain};
use orbify_core::{
    load_config_from_str, JobWorkspace, PipelineOrchestrator, SubmissionIntake, Toolchain,
};
use orbify_server::state::AppState;

/// Timestamp sent with every signed request.
pub const TIMESTAMP: &str = "1700000000";

pub struct TestFixture {
    pub router: Router,
    pub toolchain: MockToolchain,
    pub acquirer: MockAcquirer,
    pub signing_key: SigningKey,
    pub temp_dir: TempDir,
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let signing_key = SigningKey::from_bytes(&[7u8; 32]);
        let public_key = hex::encode(signing_key.verifying_key().to_bytes());

        // Webhook calls go to a closed port and fail fast
        let config = load_config_from_str(&format!(
            r#"
[discord]
application_id = "1234"
public_key = "{public_key}"
token = "secret-bot-token"
api_base = "http://127.0.0.1:9"
register_commands = false
request_timeout_secs = 2

[server]
host = "127.0.0.1"
port = 0

[workspace]
root = "{root}"
"#,
            root = temp_dir.path().join("orbs").display()
        ))
        .expect("Failed to parse test config");

        let toolchain = MockToolchain::new();
        let workspace = JobWorkspace::new(&config.workspace.root);
        let acquirer = MockAcquirer::new(workspace);

        let orchestrator = PipelineOrchestrator::new(
            Arc::new(toolchain.clone()) as Arc<dyn Toolchain>,
            &config.workspace,
        );
        let intake = SubmissionIntake::new(Arc::new(acquirer.clone()), orchestrator);

        let verifier =
            SignatureVerifier::from_hex(&config.discord.public_key).expect("Invalid test key");
        let discord = DiscordClient::new(&config.discord).expect("Failed to create client");

        let state = Arc::new(AppState::new(config, verifier, discord, intake));
        let router = orbify_server::api::create_router(state);

        Self {
            router,
            toolchain,
            acquirer,
            signing_key,
            temp_dir,
        }
    }

    /// Send a GET request.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// POST an interaction signed with the fixture's key.
    pub async fn interaction(&self, payload: Value) -> TestResponse {
        let body = serde_json::to_vec(&payload).unwrap();
        let signature = self.sign(&body);
        self.interaction_with_headers(body, Some(&signature), Some(TIMESTAMP))
            .await
    }

    /// POST raw interaction bytes with explicit signature headers.
    pub async fn interaction_with_headers(
        &self,
        body: Vec<u8>,
        signature: Option<&str>,
        timestamp: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/interactions")
            .header("Content-Type", "application/json");
        if let Some(signature) = signature {
            builder = builder.header("X-Signature-Ed25519", signature);
        }
        if let Some(timestamp) = timestamp {
            builder = builder.header("X-Signature-Timestamp", timestamp);
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    /// Hex signature over `TIMESTAMP || body`.
    pub fn sign(&self, body: &[u8]) -> String {
        let mut message = TIMESTAMP.as_bytes().to_vec();
        message.extend_from_slice(body);
        hex::encode(self.signing_key.sign(&message).to_bytes())
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body, text }
    }
}

/// A `/orbify url` invocation by user 42.
pub fn slash_url(id: &str, url: &str) -> Value {
    serde_json::json!({
        "id": id,
        "application_id": "1234",
        "type": 2,
        "token": format!("token-{id}"),
        "guild_id": "77",
        "member": {
            "user": { "id": "42", "username": "caller", "avatar": null }
        },
        "data": {
            "name": "orbify",
            "type": 1,
            "options": [{
                "name": "url", "type": 1,
                "options": [{ "name": "url", "type": 3, "value": url }]
            }]
        }
    })
}
