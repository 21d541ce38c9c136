//! Integration tests for the HTTP API.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use wordwall_core::config::WordsConfig;
use wordwall_core::{CandidatePool, Clock, ManualClock, WordService};
use wordwall_server::router::build_router;
use wordwall_server::state::AppState;

const START: u64 = 1_700_000_000_000;

fn make_service() -> (Arc<WordService>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(START));
    let pool = CandidatePool::parse("w1\nw2\nw3\nw4\nw5\n").unwrap();
    let config = WordsConfig {
        rotation_seed: Some(3),
        ..WordsConfig::default()
    };
    let service =
        WordService::with_clock(pool, &config, Arc::clone(&clock) as Arc<dyn Clock>).unwrap();
    (Arc::new(service), clock)
}

fn make_router(service: &Arc<WordService>) -> Router {
    let state = Arc::new(AppState::new(
        Arc::clone(service),
        "/videos/background.mp4",
    ));
    build_router(state)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn wait_for_waiters(service: &WordService, count: usize) {
    while service.pending_waiters() < count {
        tokio::task::yield_now().await;
    }
}

// =========================================================================
// GET /api/words
// =========================================================================

#[tokio::test]
async fn test_words_since_zero_resolves_immediately() {
    let (service, _) = make_service();
    let response = make_router(&service)
        .oneshot(get("/api/words?since=0"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    let words = json["words"].as_array().unwrap();
    assert_eq!(words.len(), 4);
    assert_eq!(words[0]["text"], "w1");
    assert_eq!(words[3]["text"], "w4");
    assert_eq!(words[0]["timestamp"], START);
    assert_eq!(json["lastChange"], START);
    assert_eq!(service.pending_waiters(), 0);
}

#[tokio::test]
async fn test_words_invalid_since_defaults_to_zero() {
    let (service, _) = make_service();
    for uri in ["/api/words", "/api/words?since=banana", "/api/words?since=-3"] {
        let response = make_router(&service).oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_to_json(response.into_body()).await;
        assert_eq!(json["lastChange"], START);
    }
}

#[tokio::test]
async fn test_words_undecodable_query_defaults_to_zero() {
    let (service, _) = make_service();
    let response = make_router(&service)
        .oneshot(get("/api/words?since=1&since=2"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["lastChange"], START);
    assert_eq!(json["words"].as_array().unwrap().len(), 4);
    assert_eq!(service.pending_waiters(), 0);
}

#[tokio::test]
async fn test_words_long_poll_resolves_on_submission() {
    let (service, clock) = make_service();
    let router = make_router(&service);

    let poll = tokio::spawn(router.oneshot(get(&format!("/api/words?since={START}"))));
    wait_for_waiters(&service, 1).await;

    clock.advance(250);
    service.submit("fresh").unwrap();

    let response = poll.await.unwrap().unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["lastChange"], START + 250);
    assert_eq!(json["words"][0]["text"], "fresh");
    assert_eq!(service.pending_waiters(), 0);
}

#[tokio::test]
async fn test_words_long_poll_resolves_on_post() {
    let (service, clock) = make_service();

    let poll = tokio::spawn(make_router(&service).oneshot(get(&format!("/api/words?since={START}"))));
    wait_for_waiters(&service, 1).await;

    clock.advance(5);
    let response = make_router(&service)
        .oneshot(post_json("/api/word", &json!({ "word": "hello" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let polled = body_to_json(poll.await.unwrap().unwrap().into_body()).await;
    assert_eq!(polled["words"][0]["text"], "hello");
}

#[tokio::test(start_paused = true)]
async fn test_words_long_poll_times_out_with_unchanged_state() {
    let (service, _) = make_service();
    let before = service.snapshot();

    let started = tokio::time::Instant::now();
    let response = make_router(&service)
        .oneshot(get(&format!("/api/words?since={START}")))
        .await
        .unwrap();
    assert!(started.elapsed() >= Duration::from_secs(12));

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json, serde_json::to_value(&before).unwrap());
    assert_eq!(service.pending_waiters(), 0);
}

#[tokio::test]
async fn test_words_poll_rejected_after_shutdown() {
    let (service, _) = make_service();

    let poll = tokio::spawn(make_router(&service).oneshot(get(&format!("/api/words?since={START}"))));
    wait_for_waiters(&service, 1).await;
    assert_eq!(service.shutdown(), 1);

    let response = poll.await.unwrap().unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].is_string());
}

// =========================================================================
// POST /api/word
// =========================================================================

#[tokio::test]
async fn test_submit_replaces_oldest_and_echoes_set() {
    let (service, clock) = make_service();
    clock.advance(100);

    let response = make_router(&service)
        .oneshot(post_json("/api/word", &json!({ "word": "w6" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["success"], true);
    let words = json["activeWords"].as_array().unwrap();
    assert_eq!(words.len(), 4);
    assert_eq!(words[0]["text"], "w6");
    assert_eq!(words[0]["timestamp"], START + 100);
    assert_eq!(words[1]["text"], "w2");
    assert_eq!(words[2]["text"], "w3");
    assert_eq!(words[3]["text"], "w4");
}

#[tokio::test]
async fn test_submit_missing_word_is_bad_request() {
    let (service, _) = make_service();
    let before = service.snapshot();

    let response = make_router(&service)
        .oneshot(post_json("/api/word", &json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].is_string());
    assert_eq!(service.snapshot(), before);
}

#[tokio::test]
async fn test_submit_non_string_word_is_bad_request() {
    let (service, _) = make_service();
    for body in [json!({ "word": 42 }), json!({ "word": null }), json!({ "word": ["a"] })] {
        let response = make_router(&service)
            .oneshot(post_json("/api/word", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
    assert_eq!(service.last_change(), START);
}

#[tokio::test]
async fn test_submit_blank_word_is_bad_request() {
    let (service, _) = make_service();
    let response = make_router(&service)
        .oneshot(post_json("/api/word", &json!({ "word": "   " })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(service.last_change(), START);
}

#[tokio::test]
async fn test_submit_malformed_body_is_bad_request() {
    let (service, _) = make_service();
    let request = Request::post("/api/word")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = make_router(&service).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].is_string());
}

// =========================================================================
// GET /api/config, GET /api/status
// =========================================================================

#[tokio::test]
async fn test_config_returns_video_path() {
    let (service, _) = make_service();
    let response = make_router(&service)
        .oneshot(get("/api/config"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["videoPath"], "/videos/background.mp4");
}

#[tokio::test]
async fn test_status_reports_service_state() {
    let (service, _) = make_service();
    let response = make_router(&service)
        .oneshot(get("/api/status"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["capacity"], 4);
    assert_eq!(json["timeoutSecs"], 12);
    assert_eq!(json["lastChange"], START);
    assert_eq!(json["pendingWaiters"], 0);
    assert_eq!(json["candidateCount"], 5);
    assert_eq!(json["closed"], false);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (service, _) = make_service();
    let response = make_router(&service)
        .oneshot(get("/api/nope"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
