//! Privacy policy route: `GET /api/privacy-policy/list`

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use super::{get_json, route_both};
use crate::cors::{READ_METHODS, preflight, with_cors};
use crate::error::ProxyError;
use crate::state::AppState;

const FETCH_FAILED: &str = "Failed to fetch privacy policy";

pub fn router() -> Router<Arc<AppState>> {
    let router = route_both(
        Router::new(),
        "/privacy-policy/list",
        get(list_privacy_policy).options(preflight),
    );
    with_cors(router, READ_METHODS)
}

async fn list_privacy_policy(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, ProxyError> {
    let url = state.endpoints.privacy_policy();
    get_json(&state, &url, FETCH_FAILED).await.map(Json)
}
