//! Request and response bodies for the REST endpoints.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::words::WordSlot;

/// Body of `POST /api/word`.
///
/// `word` is kept as a raw JSON value so the handler can tell "missing"
/// apart from "present but not a string" and reject both with a 400.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SubmitWordRequest {
    /// The submitted word; must be a non-blank JSON string.
    #[serde(default)]
    pub word: Option<serde_json::Value>,
}

/// Response of a successful `POST /api/word`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct SubmitWordResponse {
    /// Always `true`; failures use the error body instead.
    pub success: bool,
    /// The active set after the submission was applied.
    pub active_words: Vec<WordSlot>,
}

/// Response of `GET /api/config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    /// Path of the background video the display plays.
    pub video_path: String,
}

/// Response of `GET /api/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Number of slots in the active set.
    #[ts(type = "number")]
    pub capacity: usize,
    /// Rotation and long-poll timeout in seconds.
    #[ts(type = "number")]
    pub timeout_secs: u64,
    /// Current change token.
    #[ts(type = "number")]
    pub last_change: u64,
    /// Long-poll requests currently parked.
    #[ts(type = "number")]
    pub pending_waiters: usize,
    /// Size of the predefined candidate pool.
    #[ts(type = "number")]
    pub candidate_count: usize,
    /// Whether the service has shut down.
    pub closed: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn submit_request_distinguishes_missing_from_wrong_type() {
        let missing: SubmitWordRequest = serde_json::from_str("{}").unwrap();
        assert!(missing.word.is_none());

        let number: SubmitWordRequest = serde_json::from_str(r#"{"word": 42}"#).unwrap();
        assert_eq!(number.word, Some(serde_json::json!(42)));
    }

    #[test]
    fn submit_response_field_names() {
        let response = SubmitWordResponse {
            success: true,
            active_words: vec![WordSlot::new("passion", 9)],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["activeWords"][0]["timestamp"], 9);
    }

    #[test]
    fn config_response_field_name() {
        let json = serde_json::to_value(ConfigResponse {
            video_path: String::from("/videos/background.mp4"),
        })
        .unwrap();
        assert_eq!(json["videoPath"], "/videos/background.mp4");
    }
}
