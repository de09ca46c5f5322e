//! Request logging middleware
//!
//! One access log line per request on the `http_access` target.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

/// Log method, matched path, status and latency of every request
pub async fn log_request(req: Request, next: Next) -> Response {
    let start = Instant::now();

    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let response = next.run(req).await;

    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status();

    if status.is_server_error() {
        tracing::warn!(
            target: "http_access",
            request_id = %request_id,
            method = %method,
            path = %path,
            uri = %uri,
            status = status.as_u16(),
            latency_ms,
            "Request completed with server error"
        );
    } else if status.is_client_error() {
        tracing::info!(
            target: "http_access",
            request_id = %request_id,
            method = %method,
            path = %path,
            uri = %uri,
            status = status.as_u16(),
            latency_ms,
            "Request completed with client error"
        );
    } else {
        tracing::info!(
            target: "http_access",
            request_id = %request_id,
            method = %method,
            path = %path,
            uri = %uri,
            status = status.as_u16(),
            latency_ms,
            "Request completed"
        );
    }

    response
}
