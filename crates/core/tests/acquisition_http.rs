//! HTTP acquisition integration tests.
//!
//! A local axum server stands in for the CDN; the probe is mocked.

use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, routing::get, Router};
use tempfile::TempDir;
use tokio::net::TcpListener;

use orbify_core::{
    testing::MockToolchain, AcquisitionError, HttpAcquirer, InputSource, JobWorkspace,
    SourceAcquirer,
};

async fn serve() -> String {
    let app = Router::new()
        .route("/images/cat.png", get(|| async { &b"\x89PNG-cat"[..] }))
        .route("/notes.txt", get(|| async { "just text" }))
        .route("/missing.png", get(|| async { StatusCode::NOT_FOUND }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn acquirer(temp: &TempDir, toolchain: &MockToolchain) -> HttpAcquirer {
    HttpAcquirer::new(
        Arc::new(toolchain.clone()),
        JobWorkspace::new(temp.path()),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_download_is_stored_with_source_extension() {
    let base = serve().await;
    let temp = TempDir::new().unwrap();
    let toolchain = MockToolchain::new();

    let source = InputSource::Url {
        url: format!("{}/images/cat.png", base),
    };
    let acquired = acquirer(&temp, &toolchain)
        .acquire("100", &source)
        .await
        .unwrap();

    assert_eq!(acquired.path, temp.path().join("100").join("orb-input.png"));
    assert_eq!(acquired.kind, "video");
    assert_eq!(acquired.size_bytes, 8);
    assert_eq!(tokio::fs::read(&acquired.path).await.unwrap(), b"\x89PNG-cat");
}

#[tokio::test]
async fn test_attachment_uses_filename_extension() {
    let base = serve().await;
    let temp = TempDir::new().unwrap();
    let toolchain = MockToolchain::new();

    let source = InputSource::Attachment {
        url: format!("{}/images/cat.png", base),
        filename: "Funny.GIF".to_string(),
    };
    let acquired = acquirer(&temp, &toolchain)
        .acquire("101", &source)
        .await
        .unwrap();

    assert_eq!(acquired.path, temp.path().join("101").join("orb-input.gif"));
}

#[tokio::test]
async fn test_non_graphical_download_rejected() {
    let base = serve().await;
    let temp = TempDir::new().unwrap();
    let toolchain = MockToolchain::new();
    toolchain.set_probe_kind("").await;

    let source = InputSource::Url {
        url: format!("{}/notes.txt", base),
    };
    let result = acquirer(&temp, &toolchain).acquire("102", &source).await;

    assert!(matches!(result, Err(AcquisitionError::NotGraphical { .. })));
}

#[tokio::test]
async fn test_http_error_status() {
    let base = serve().await;
    let temp = TempDir::new().unwrap();
    let toolchain = MockToolchain::new();

    let source = InputSource::Url {
        url: format!("{}/missing.png", base),
    };
    let result = acquirer(&temp, &toolchain).acquire("103", &source).await;

    assert!(matches!(
        result,
        Err(AcquisitionError::Status { status: 404, .. })
    ));
    assert!(!temp.path().join("103").exists());
    assert!(toolchain.recorded_invocations().await.is_empty());
}
