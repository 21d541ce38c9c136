//! Error types for the HTTP API.
//!
//! [`ApiError`] converts into an Axum response with a JSON body of the
//! form `{ "error": "...", "status": 400 }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use wordwall_core::WordError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body or a parameter was invalid.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The word service has shut down.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<WordError> for ApiError {
    fn from(err: WordError) -> Self {
        let message = err.to_string();
        match err {
            WordError::Validation(_) => Self::BadRequest(message),
            WordError::Closed => Self::Unavailable(message),
            WordError::InvariantViolation(_) => Self::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal API error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
