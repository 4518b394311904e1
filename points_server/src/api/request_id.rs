//! Request ID middleware for tracing and debugging.
//!
//! Each request gets an `x-request-id` (taken from the incoming header or
//! freshly generated), echoed back on the response and recorded on a span
//! wrapping the request, so every log line it produces carries the ID.
//! The same middleware times the request and records the HTTP metrics.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::{logging, metrics};

/// Header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Generate or extract request ID from headers
fn get_or_generate_request_id(headers: &axum::http::HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Middleware to add request ID to all requests and responses
///
/// # Example
///
/// ```no_run
/// use axum::{Router, routing::get, middleware};
/// use points_server::api::request_id::request_id_middleware;
///
/// # async fn example() {
/// let app: Router = Router::new()
///     .route("/", get(|| async { "Hello" }))
///     .layer(middleware::from_fn(request_id_middleware));
/// # }
/// ```
pub async fn request_id_middleware(
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let request_id = get_or_generate_request_id(request.headers());

    let method = request.method().to_string();
    // Route template keeps user ids out of metric labels
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        uri = %request.uri(),
        "Request started"
    );

    let span = tracing::info_span!("request", request_id = %request_id);
    let started = Instant::now();
    let response = next.run(request).instrument(span).await;
    let duration_ms = started.elapsed().as_millis() as u64;

    let (mut parts, body) = response.into_parts();
    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        parts.headers.insert(REQUEST_ID_HEADER, header_value);
    }

    let status = parts.status.as_u16();
    logging::log_api_request(&request_id, &method, &path, status, duration_ms);
    metrics::http_requests_total(&method, &path, status);
    metrics::http_request_duration_ms(&method, &path, duration_ms as f64);

    Ok(Response::from_parts(parts, body))
}
