use std::io::Write;
use std::net::TcpListener;
use std::time::Duration;

use reqwest::Client;
use tempfile::{NamedTempFile, TempDir};
use tokio::time::{sleep, timeout};

/// Public key of the all-sevens test signing key.
const PUBLIC_KEY: &str = "ea4a6c63e29c520abef5507b132ec5f9954776aebebe7b92421eea691446d22c";

/// Find an available port
fn get_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Create a minimal valid config
fn minimal_config(port: u16, workspace: &std::path::Path) -> String {
    format!(
        r#"
[discord]
application_id = "1234"
public_key = "{}"
register_commands = false

[server]
host = "127.0.0.1"
port = {}

[workspace]
root = "{}"
"#,
        PUBLIC_KEY,
        port,
        workspace.display()
    )
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

/// Spawn the server and return a handle
async fn spawn_server(config_path: &std::path::Path) -> tokio::process::Child {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_orbify"))
        .env("ORBIFY_CONFIG", config_path)
        .env("RUST_LOG", "error") // Quiet logs during tests
        .env_remove("TOKEN")
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn server")
}

/// Wait for server to be ready
async fn wait_for_server(port: u16, max_attempts: u32) -> bool {
    let client = Client::new();
    for _ in 0..max_attempts {
        if client
            .get(format!("http://127.0.0.1:{}/api/v1/health", port))
            .send()
            .await
            .is_ok()
        {
            return true;
        }
        sleep(Duration::from_millis(50)).await;
    }
    false
}

async fn run_to_exit(config_path: &std::path::Path) -> std::process::Output {
    timeout(
        Duration::from_secs(5),
        tokio::process::Command::new(env!("CARGO_BIN_EXE_orbify"))
            .env("ORBIFY_CONFIG", config_path)
            .env("RUST_LOG", "error")
            .env_remove("TOKEN")
            .output(),
    )
    .await
    .expect("Command timed out")
    .expect("Failed to execute command")
}

#[tokio::test]
async fn test_server_starts_and_creates_workspace() {
    let port = get_available_port();
    let workspace = TempDir::new().unwrap();
    let root = workspace.path().join("orbs");
    let config = write_config(&minimal_config(port, &root));

    let mut server = spawn_server(config.path()).await;

    assert!(
        wait_for_server(port, 60).await,
        "Server did not start in time"
    );
    assert!(root.is_dir());

    let client = Client::new();
    let response = client
        .get(format!("http://127.0.0.1:{}/api/v1/config", port))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let json: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(json["server"]["port"], port);
    assert_eq!(json["discord"]["token_configured"], false);

    server.kill().await.ok();
}

#[tokio::test]
async fn test_unsigned_interaction_is_rejected() {
    let port = get_available_port();
    let workspace = TempDir::new().unwrap();
    let config = write_config(&minimal_config(port, workspace.path()));

    let mut server = spawn_server(config.path()).await;
    assert!(
        wait_for_server(port, 60).await,
        "Server did not start in time"
    );

    let response = Client::new()
        .post(format!("http://127.0.0.1:{}/interactions", port))
        .json(&serde_json::json!({ "id": "1", "application_id": "1234", "type": 1 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status().as_u16(), 401);

    server.kill().await.ok();
}

#[tokio::test]
async fn test_missing_config_file_exits_with_error() {
    let result = run_to_exit(std::path::Path::new("/nonexistent/config.toml")).await;
    assert!(!result.status.success());
}

#[tokio::test]
async fn test_missing_discord_section_exits_with_error() {
    let config = write_config(
        r#"
[server]
port = 8080
"#,
    );

    let result = run_to_exit(config.path()).await;
    assert!(!result.status.success());
}

#[tokio::test]
async fn test_registration_without_token_exits_with_error() {
    let config = write_config(&format!(
        r#"
[discord]
application_id = "1234"
public_key = "{}"
register_commands = true
"#,
        PUBLIC_KEY
    ));

    let result = run_to_exit(config.path()).await;
    assert!(!result.status.success());
}
