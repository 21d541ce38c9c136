//! Background startup helper for the engine binary.
//!
//! [`spawn_server`] launches the HTTP server on a Tokio task that stops
//! gracefully once the shared shutdown flag flips to `true`.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Spawn the HTTP server on a background Tokio task.
///
/// The address is validated before spawning so obvious misconfiguration
/// fails fast. The returned handle resolves when the server has drained
/// after `shutdown` reads `true` (or its sender is dropped).
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the configured address is invalid.
pub fn spawn_server(
    config: ServerConfig,
    state: Arc<AppState>,
    shutdown: watch::Receiver<bool>,
) -> Result<JoinHandle<Result<(), ServerError>>, StartupError> {
    let addr = config.socket_addr()?;

    let handle = tokio::spawn(async move {
        let result = crate::server::start_server(&config, state, wait_for_shutdown(shutdown)).await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "wordwall server exited with error");
        }
        result
    });

    tracing::info!(%addr, "wordwall server spawned on background task");
    Ok(handle)
}

/// Resolve once `shutdown` holds `true` or its sender is gone.
pub async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    // `wait_for` errors only when the sender is dropped, which also means stop.
    let _ = shutdown.wait_for(|stop| *stop).await;
}
