//! REST endpoint handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/words?since=<ms>` | Long-poll for the active words |
//! | `POST` | `/api/word` | Submit a word; replaces the oldest one |
//! | `GET` | `/api/config` | Display configuration (video path) |
//! | `GET` | `/api/status` | Service status |

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use tracing::debug;
use wordwall_types::{
    ConfigResponse, StatusResponse, SubmitWordRequest, SubmitWordResponse, WordsUpdate,
};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for `GET /api/words`.
///
/// `since` is kept as a string so that a malformed value degrades to `0`
/// instead of failing the request.
#[derive(Debug, Default, serde::Deserialize)]
pub struct WordsQuery {
    /// Last change token the client has seen, in epoch milliseconds.
    pub since: Option<String>,
}

impl WordsQuery {
    /// The parsed token; missing, negative, or non-numeric input is `0`.
    pub fn since(&self) -> u64 {
        self.since
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// GET /api/words -- long poll
// ---------------------------------------------------------------------------

/// Return the active words once they are newer than `since`, or after the
/// timeout with the unchanged set.
///
/// A query string that does not deserialize (for example a repeated
/// `since`) is treated like an omitted one.
pub async fn get_words(
    State(state): State<Arc<AppState>>,
    query: Result<Query<WordsQuery>, QueryRejection>,
) -> Result<Json<WordsUpdate>, ApiError> {
    let since = match query {
        Ok(Query(query)) => query.since(),
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "Unreadable words query, using since=0");
            0
        }
    };
    let update = state.service.long_poll(since).await?;
    Ok(Json(update))
}

// ---------------------------------------------------------------------------
// POST /api/word -- submit
// ---------------------------------------------------------------------------

/// Submit a word. It replaces the oldest visible word and wakes every
/// parked poll.
///
/// Rejects with 400 when the body is not JSON, `word` is missing, `word`
/// is not a string, or `word` is blank.
pub async fn post_word(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SubmitWordRequest>, JsonRejection>,
) -> Result<Json<SubmitWordResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let word = match request.word {
        Some(serde_json::Value::String(word)) => word,
        Some(_) => return Err(ApiError::BadRequest("word must be a string".to_owned())),
        None => return Err(ApiError::BadRequest("word is required".to_owned())),
    };

    let active_words = state.service.submit(&word)?;
    debug!(word = %word, "Accepted submitted word");

    Ok(Json(SubmitWordResponse {
        success: true,
        active_words,
    }))
}

// ---------------------------------------------------------------------------
// GET /api/config
// ---------------------------------------------------------------------------

/// Return the display configuration.
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        video_path: state.video_path.clone(),
    })
}

// ---------------------------------------------------------------------------
// GET /api/status
// ---------------------------------------------------------------------------

/// Return capacity, timeout, change token, and waiter count.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(state.service.status())
}
