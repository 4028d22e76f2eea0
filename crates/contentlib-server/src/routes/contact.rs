//! Contact routes: `POST /api/contact/contacts`

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tower::limit::GlobalConcurrencyLimitLayer;

use super::{MAX_IN_FLIGHT_SUBMISSIONS, post_json, route_both};
use crate::cors::{WRITE_METHODS, preflight, with_cors};
use crate::error::ProxyError;
use crate::state::AppState;

const SUBMIT_FAILED: &str = "Failed to submit contact form";

pub fn router() -> Router<Arc<AppState>> {
    let router = route_both(
        Router::new(),
        "/contact/contacts",
        post(submit_contact).options(preflight),
    )
    .layer(GlobalConcurrencyLimitLayer::new(MAX_IN_FLIGHT_SUBMISSIONS));
    with_cors(router, WRITE_METHODS)
}

async fn submit_contact(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, ProxyError> {
    let url = state.endpoints.contacts();
    post_json(&state, &url, &body, SUBMIT_FAILED).await.map(Json)
}
