//! Lead routes: `POST /api/casestudy/case-study-leads`
//!
//! The body is forwarded untouched; the upstream owns validation.

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

const SUBMIT_FAILED: &str = "Failed to submit case study lead";

pub fn router() -> Router<Arc<AppState>> {
    let router = route_both(
        Router::new(),
        "/casestudy/case-study-leads",
        post(submit_lead).options(preflight),
    )
    .layer(GlobalConcurrencyLimitLayer::new(MAX_IN_FLIGHT_SUBMISSIONS));
    with_cors(router, WRITE_METHODS)
}

async fn submit_lead(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, ProxyError> {
    let url = state.endpoints.case_study_leads();
    post_json(&state, &url, &body, SUBMIT_FAILED).await.map(Json)
}
