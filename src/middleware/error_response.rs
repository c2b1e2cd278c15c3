//! Error response normalization middleware
//!
//! Framework rejections (malformed JSON, bad path or query parameters,
//! unknown routes) come back as text/plain or with an empty body. This
//! middleware rewrites them into the envelope the route family uses:
//! `{"success": false, "message": ...}` under `/api/auth`, and
//! `{"error": {"message": ...}}` everywhere else.
//!
//! A body that is valid JSON but does not fit the target type is reported as
//! 400 like any other validation failure, not axum's 422.

use crate::error::ErrorResponse;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

const AUTH_PREFIX: &str = "/api/auth";

pub async fn normalize_error_response(request: Request<Body>, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    let status = response.status();

    // Probes and the scrape endpoint answer in plain text
    if path == "/health" || path == "/ready" || path == "/metrics" {
        return response;
    }

    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    // Already shaped by AppError or a handler
    if content_type.contains("application/json") {
        return response;
    }

    let (status, message) = match status {
        StatusCode::UNPROCESSABLE_ENTITY => (StatusCode::BAD_REQUEST, "Invalid request body"),
        _ => (status, rejection_message(status)),
    };

    if is_auth_path(&path) {
        auth_error_response(status, message)
    } else {
        resource_error_response(status, message)
    }
}

fn is_auth_path(path: &str) -> bool {
    path == AUTH_PREFIX || path.starts_with("/api/auth/")
}

fn rejection_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "Invalid request",
        StatusCode::UNAUTHORIZED => "Login required.",
        StatusCode::FORBIDDEN => "Access denied",
        StatusCode::NOT_FOUND => "Not found",
        StatusCode::METHOD_NOT_ALLOWED => "Method not allowed",
        StatusCode::PAYLOAD_TOO_LARGE => "Request body too large",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "Expected a JSON request body",
        StatusCode::REQUEST_TIMEOUT => "Request timed out",
        _ if status.is_client_error() => "Client error",
        _ => "An internal error occurred",
    }
}

fn resource_error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

fn auth_error_response(status: StatusCode, message: &str) -> Response {
    let body = json!({
        "success": false,
        "message": message,
    });
    (status, Json(body)).into_response()
}
