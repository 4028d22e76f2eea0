//! Cross-origin headers.
//!
//! Each resource advertises only its own verbs, so the headers are attached
//! per resource router rather than once for the whole app.

use axum::Router;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderValue, StatusCode};
use tower_http::set_header::SetResponseHeaderLayer;

/// Verbs for read-only resources.
pub const READ_METHODS: &str = "GET, OPTIONS";
/// Verbs for submission resources.
pub const WRITE_METHODS: &str = "POST, OPTIONS";

/// Attach `Access-Control-Allow-*` headers to every response of `router`.
pub fn with_cors<S>(router: Router<S>, methods: &'static str) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(methods),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
}

/// `OPTIONS` responder; the headers come from [`with_cors`].
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}
