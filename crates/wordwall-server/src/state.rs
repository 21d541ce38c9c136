//! Shared application state for the HTTP API.

use std::sync::Arc;

use wordwall_core::WordService;

/// Shared state injected into handlers via Axum's `State` extractor.
///
/// All word state lives inside the [`WordService`]; handlers never touch
/// the buffer or the waiter registry directly.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The single owner of active words and parked waiters.
    pub service: Arc<WordService>,
    /// Background video path passed through to the frontend.
    pub video_path: String,
}

impl AppState {
    /// Create application state around an existing service.
    pub fn new(service: Arc<WordService>, video_path: impl Into<String>) -> Self {
        Self {
            service,
            video_path: video_path.into(),
        }
    }
}
