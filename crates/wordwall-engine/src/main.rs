//! wordwall binary.
//!
//! Wires together the word service, the rotation loop, and the HTTP API,
//! then runs until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Read `wordwall-config.yaml` (defaults when absent)
//! 2. Initialize structured logging (tracing)
//! 3. Apply environment overrides and validate the configuration
//! 4. Load the predefined word list (fallback list on failure)
//! 5. Build the word service
//! 6. Spawn the rotation loop and the HTTP server
//! 7. On `Ctrl-C`: reject parked polls, stop rotation, drain the server

mod error;

use std::path::Path;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wordwall_core::runner::spawn_rotation;
use wordwall_core::{CandidatePool, ROTATION_TICK, WallConfig, WordService};
use wordwall_server::{AppState, ServerConfig, spawn_server};

use crate::error::EngineError;

/// Configuration file looked up in the working directory.
const CONFIG_PATH: &str = "wordwall-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, startup, or the server fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Read the configuration file.
    let config = WallConfig::read(Path::new(CONFIG_PATH))?;

    // 2. Initialize structured logging. RUST_LOG wins over the config file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("wordwall starting");

    // 3. Environment overrides and validation.
    let config = config.resolve()?;
    info!(
        host = config.server.host,
        port = config.server.port,
        capacity = config.words.capacity,
        timeout_secs = config.words.timeout_secs,
        words_file = %config.words.words_file.display(),
        video_path = config.display.video_path,
        "Configuration loaded"
    );

    // 4. Predefined words.
    let pool = CandidatePool::load_or_fallback(&config.words.words_file);

    // 5. Word service.
    let service = Arc::new(WordService::new(pool, &config.words)?);

    // 6. Background tasks.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let rotation = spawn_rotation(Arc::clone(&service), ROTATION_TICK, shutdown_rx.clone());

    let state = Arc::new(AppState::new(
        Arc::clone(&service),
        config.display.video_path.clone(),
    ));
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let server = spawn_server(server_config, state, shutdown_rx)?;

    // 7. Wait for Ctrl-C, then shut down in order.
    tokio::signal::ctrl_c()
        .await
        .map_err(|source| EngineError::Signal { source })?;
    info!("Shutdown requested");

    let rejected = service.shutdown();
    // Receivers only go away if both tasks already exited.
    let _ = shutdown_tx.send(true);

    let total_rotated = rotation.await.map_err(|e| EngineError::Task {
        message: format!("rotation loop: {e}"),
    })?;
    server.await.map_err(|e| EngineError::Task {
        message: format!("http server: {e}"),
    })??;

    info!(
        rejected_waiters = rejected,
        total_rotated, "wordwall shutdown complete"
    );
    Ok(())
}
