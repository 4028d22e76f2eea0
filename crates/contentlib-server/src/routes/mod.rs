//! HTTP route handlers for the proxy.
//!
//! Everything lives under `/api` and mirrors the upstream resource paths.
//! Each path is registered with and without a trailing slash.

pub mod case_studies;
pub mod contact;
pub mod leads;
pub mod privacy;

use std::sync::Arc;

use axum::Router;
use axum::routing::MethodRouter;
use serde_json::Value;
use tracing::debug;

use crate::error::ProxyError;
use crate::state::AppState;
use crate::upstream::UpstreamResponse;

/// Prefix every proxy route is mounted under.
pub const API_PREFIX: &str = "/api";

/// Submissions forwarded upstream at once, per resource. Both spellings of
/// a path (with and without the trailing slash) draw from the same permits.
pub const MAX_IN_FLIGHT_SUBMISSIONS: usize = 32;

/// Build the full proxy router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(case_studies::router())
        .merge(leads::router())
        .merge(contact::router())
        .merge(privacy::router())
        .with_state(state)
}

/// Register `path` (relative to [`API_PREFIX`]) with and without a trailing slash.
pub(crate) fn route_both(
    router: Router<Arc<AppState>>,
    path: &str,
    method_router: MethodRouter<Arc<AppState>>,
) -> Router<Arc<AppState>> {
    let path = format!("{API_PREFIX}{}", path.trim_end_matches('/'));
    router
        .route(&format!("{path}/"), method_router.clone())
        .route(&path, method_router)
}

/// Check the status and decode the body of an upstream response.
pub(crate) fn into_json(
    response: &UpstreamResponse,
    failure: &'static str,
) -> Result<Value, ProxyError> {
    if !response.is_success() {
        return Err(ProxyError::Upstream {
            status: response.status,
            error: response.status_text.clone(),
        });
    }
    response.json().map_err(|e| ProxyError::internal(failure, &e))
}

/// `GET url` upstream and return the decoded body.
pub(crate) async fn get_json(
    state: &AppState,
    url: &str,
    failure: &'static str,
) -> Result<Value, ProxyError> {
    debug!(upstream_url = %url, "forwarding GET");
    let response = state
        .upstream
        .get(url)
        .await
        .map_err(|e| ProxyError::internal(failure, &e))?;
    into_json(&response, failure)
}

/// Forward a raw JSON request body upstream via `POST url`.
///
/// A body that is not JSON is rejected before anything is sent. On a
/// non-success upstream status the error detail is the upstream `message`
/// when the error body has one, the status text otherwise.
pub(crate) async fn post_json(
    state: &AppState,
    url: &str,
    body: &[u8],
    failure: &'static str,
) -> Result<Value, ProxyError> {
    let payload: Value =
        serde_json::from_slice(body).map_err(|e| ProxyError::internal(failure, &e))?;

    debug!(upstream_url = %url, "forwarding POST");
    let response = state
        .upstream
        .post_json(url, &payload)
        .await
        .map_err(|e| ProxyError::internal(failure, &e))?;

    if !response.is_success() {
        let error = response
            .json()
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| response.status_text.clone());
        return Err(ProxyError::Upstream {
            status: response.status,
            error,
        });
    }
    response.json().map_err(|e| ProxyError::internal(failure, &e))
}
