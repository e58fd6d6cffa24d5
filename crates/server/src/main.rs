use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use orbify_core::chat::discord::{command_definitions, DiscordClient, SignatureVerifier};
use orbify_core::{
    load_config, validate_config, HttpAcquirer, JobWorkspace, PipelineOrchestrator,
    ProcessToolchain, SubmissionIntake, Toolchain,
};

use orbify_server::{api::create_router, state::AppState};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("orbify {} starting", VERSION);

    // Determine config path
    let config_path = std::env::var("ORBIFY_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Discord application: {}", config.discord.application_id);
    info!("Workspace root: {:?}", config.workspace.root);

    let verifier = SignatureVerifier::from_hex(&config.discord.public_key)
        .context("Invalid discord.public_key")?;
    let discord =
        DiscordClient::new(&config.discord).context("Failed to create Discord client")?;

    if config.discord.register_commands {
        match discord.register_commands(&command_definitions()).await {
            Ok(()) => info!("Registered application commands"),
            Err(e) => warn!("Failed to register application commands: {}", e),
        }
    } else {
        info!("Command registration disabled in config");
    }

    // Render toolchain
    let toolchain = ProcessToolchain::new(config.toolchain.clone());
    match toolchain.validate().await {
        Ok(()) => info!("Render toolchain ready"),
        Err(e) => warn!("Render toolchain incomplete, renders will fail: {}", e),
    }
    let toolchain: Arc<dyn Toolchain> = Arc::new(toolchain);

    tokio::fs::create_dir_all(&config.workspace.root)
        .await
        .with_context(|| format!("Failed to create workspace {:?}", config.workspace.root))?;

    let orchestrator = PipelineOrchestrator::new(Arc::clone(&toolchain), &config.workspace);
    let acquirer = HttpAcquirer::new(
        toolchain,
        JobWorkspace::new(&config.workspace.root),
        Duration::from_secs(config.discord.request_timeout_secs),
    )
    .context("Failed to create source downloader")?;
    let intake = SubmissionIntake::new(Arc::new(acquirer), orchestrator);

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), verifier, discord, intake));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
