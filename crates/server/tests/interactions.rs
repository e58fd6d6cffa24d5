//! Interaction endpoint and API tests against the in-process router.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

use common::{slash_url, TestFixture, TIMESTAMP};
use orbify_core::testing::AcquireBehavior;
use orbify_core::toolchain::Tool;

async fn wait_for<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn test_signed_ping_is_answered_with_pong() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .interaction(json!({ "id": "1", "application_id": "1234", "type": 1 }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "type": 1 }));
}

#[tokio::test]
async fn test_missing_signature_is_unauthorized() {
    let fixture = TestFixture::new().await;
    let body = br#"{"id":"1","application_id":"1234","type":1}"#.to_vec();

    let response = fixture
        .interaction_with_headers(body, None, Some(TIMESTAMP))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_tampered_body_is_unauthorized() {
    let fixture = TestFixture::new().await;
    let signed = br#"{"id":"1","application_id":"1234","type":1}"#;
    let signature = fixture.sign(signed);

    let response = fixture
        .interaction_with_headers(
            br#"{"id":"2","application_id":"1234","type":1}"#.to_vec(),
            Some(&signature),
            Some(TIMESTAMP),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signed_garbage_is_bad_request() {
    let fixture = TestFixture::new().await;
    let body = b"not json".to_vec();
    let signature = fixture.sign(&body);

    let response = fixture
        .interaction_with_headers(body, Some(&signature), Some(TIMESTAMP))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_command_gets_ephemeral_reply() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .interaction(json!({
            "id": "5",
            "application_id": "1234",
            "type": 2,
            "token": "tok",
            "user": { "id": "42", "username": "caller" },
            "data": { "name": "something-else", "type": 1 }
        }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["type"], 4);
    assert_eq!(response.body["data"]["content"], "how");
    assert_eq!(response.body["data"]["flags"], 64);
    assert!(fixture.acquirer.acquired_ids().await.is_empty());
}

#[tokio::test]
async fn test_url_submission_is_acknowledged_and_processed() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .interaction(slash_url("900", "https://example.com/cat.png"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["type"], 4);
    assert_eq!(response.body["data"]["content"], "Downloading your image...");
    assert!(response.body["data"].get("flags").is_none());

    let acquirer = fixture.acquirer.clone();
    assert!(
        wait_for(|| {
            let acquirer = acquirer.clone();
            async move { acquirer.acquired_ids().await == vec!["900".to_string()] }
        })
        .await,
        "submission was never acquired"
    );

    let toolchain = fixture.toolchain.clone();
    assert!(
        wait_for(|| {
            let toolchain = toolchain.clone();
            async move { toolchain.invocation_count(Tool::Render).await == 1 }
        })
        .await,
        "submission was never rendered"
    );

    // Delivery fails against the unreachable API; the job still leaves the queue
    let mut drained = false;
    for _ in 0..100 {
        if fixture.get("/api/v1/queue").await.body["length"] == 0 {
            drained = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(drained, "job never left the queue");
}

#[tokio::test]
async fn test_rejected_source_never_reaches_the_queue() {
    let fixture = TestFixture::new().await;
    fixture
        .acquirer
        .set_behavior(AcquireBehavior::NotGraphical)
        .await;

    let response = fixture
        .interaction(slash_url("901", "https://example.com/song.mp3"))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let acquirer = fixture.acquirer.clone();
    assert!(
        wait_for(|| {
            let acquirer = acquirer.clone();
            async move { !acquirer.acquired_ids().await.is_empty() }
        })
        .await
    );
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(fixture.get("/api/v1/queue").await.body["length"], 0);
    assert_eq!(fixture.toolchain.invocation_count(Tool::Render).await, 0);
    assert!(!fixture.temp_dir.path().join("orbs").join("901").exists());
}

#[tokio::test]
async fn test_health_endpoint() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_config_endpoint_hides_token() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/config").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["discord"]["application_id"], "1234");
    assert_eq!(response.body["discord"]["token_configured"], true);
    assert!(response.body["discord"].get("token").is_none());
    assert!(!response.text.contains("secret-bot-token"));
}

#[tokio::test]
async fn test_queue_endpoint_starts_empty() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/queue").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["length"], 0);
    assert_eq!(response.body["jobs"], json!([]));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new().await;
    fixture.get("/api/v1/health").await;

    let response = fixture.get("/metrics").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text.contains("orbify_http_requests_total"));
    assert!(response.text.contains("orbify_queue_depth"));
}
