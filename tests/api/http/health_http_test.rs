//! Health probes and router-level behavior

use super::{build_test_router, get_json, send, TestAppState};
use axum::http::{Method, StatusCode};
use foodtip_core::api::health::HealthResponse;
use serde_json::{json, Value};

#[tokio::test]
async fn test_health_returns_200() {
    let app = build_test_router(TestAppState::default());

    let (status, body): (StatusCode, Option<HealthResponse>) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().status, "healthy");
}

#[tokio::test]
async fn test_ready_returns_200() {
    let app = build_test_router(TestAppState::default());

    let response = send(&app, Method::GET, "/ready", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_gets_error_envelope() {
    let app = build_test_router(TestAppState::default());

    let (status, body): (StatusCode, Option<Value>) = get_json(&app, "/api/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.unwrap(), json!({ "error": { "message": "Not found" } }));
}

#[tokio::test]
async fn test_unknown_auth_route_gets_auth_envelope() {
    let app = build_test_router(TestAppState::default());

    let (status, body): (StatusCode, Option<Value>) = get_json(&app, "/api/auth/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.unwrap(), json!({ "success": false, "message": "Not found" }));
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = build_test_router(TestAppState::default());

    let response = send(&app, Method::GET, "/health", None, None).await;

    assert!(response.headers.contains_key("x-request-id"));
}
