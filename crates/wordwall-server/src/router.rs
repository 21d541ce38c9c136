//! Axum router construction.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /api/words` -- long-poll for active words
/// - `POST /api/word` -- submit a word
/// - `GET /api/config` -- display configuration
/// - `GET /api/status` -- service status
///
/// CORS allows any origin since the display frontend is served separately.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/words", get(handlers::get_words))
        .route("/api/word", post(handlers::post_word))
        .route("/api/config", get(handlers::get_config))
        .route("/api/status", get(handlers::get_status))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
