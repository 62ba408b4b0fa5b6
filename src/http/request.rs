//! Per-request tracing context.
//!
//! # Responsibilities
//! - Carry the request ID (set by `SetRequestIdLayer`) into the request span
//! - Echo it back to the client via `PropagateRequestIdLayer`

use axum::body::Body;
use axum::http::Request;
use tracing::Span;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID header value, or "unknown" when absent or not UTF-8.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Span factory for `TraceLayer`.
pub fn make_request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id(request),
    )
}
