//! Case study routes: `/api/casestudy/case-studies/*`
//!
//! - `GET /api/casestudy/case-studies?page=<n>` — one listing page
//! - `GET /api/casestudy/case-studies/{id}` — one item by id
//! - `GET /api/casestudy/case-studies/slug/{slug}` — one item by slug

use std::sync::Arc;

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{get_json, into_json, route_both};
use crate::cors::{READ_METHODS, preflight, with_cors};
use crate::error::ProxyError;
use crate::state::AppState;

const LIST_FAILED: &str = "Failed to fetch case studies";
const ITEM_FAILED: &str = "Failed to fetch case study";

pub fn router() -> Router<Arc<AppState>> {
    let router = Router::new();
    let router = route_both(
        router,
        "/casestudy/case-studies",
        get(list_case_studies).options(preflight),
    );
    let router = route_both(
        router,
        "/casestudy/case-studies/slug",
        get(missing_slug).options(preflight),
    );
    let router = route_both(
        router,
        "/casestudy/case-studies/slug/{slug}",
        get(get_case_study_by_slug).options(preflight),
    );
    let router = route_both(
        router,
        "/casestudy/case-studies/{id}",
        get(get_case_study).options(preflight),
    );
    with_cors(router, READ_METHODS)
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

// ── Handlers ─────────────────────────────────────────────────────────

/// Forward one listing page. The page defaults to `1`.
async fn list_case_studies(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Value>, ProxyError> {
    let Query(query) = query?;
    let page = query
        .page
        .map(|p| p.trim().to_owned())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| "1".to_owned());

    let url = state.endpoints.case_studies(&page);
    get_json(&state, &url, LIST_FAILED).await.map(Json)
}

async fn get_case_study(
    State(state): State<Arc<AppState>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ProxyError> {
    let Path(id) = id?;
    let id = id.trim();
    if id.is_empty() {
        return Err(ProxyError::BadRequest("Case study ID is required"));
    }
    let url = state.endpoints.case_study(id);
    get_json(&state, &url, ITEM_FAILED).await.map(Json)
}

async fn missing_slug() -> ProxyError {
    ProxyError::BadRequest("Case study slug is required")
}

/// Look an item up by slug.
///
/// Tries the `?slug=` listing filter first and falls back to the item path
/// when that is not answered with success. A list-shaped `data` is searched
/// for an exact slug match and narrowed to that item.
async fn get_case_study_by_slug(
    State(state): State<Arc<AppState>>,
    slug: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ProxyError> {
    let Path(slug) = slug?;
    let slug = slug.trim();
    if slug.is_empty() {
        return Err(ProxyError::BadRequest("Case study slug is required"));
    }

    let query_url = state.endpoints.case_study_by_slug(slug);
    debug!(upstream_url = %query_url, "forwarding GET");
    let mut response = state
        .upstream
        .get(&query_url)
        .await
        .map_err(|e| ProxyError::internal(ITEM_FAILED, &e))?;

    if !response.is_success() {
        let path_url = state.endpoints.case_study(slug);
        debug!(
            status = response.status,
            upstream_url = %path_url,
            "slug query failed, retrying by path"
        );
        response = state
            .upstream
            .get(&path_url)
            .await
            .map_err(|e| ProxyError::internal(ITEM_FAILED, &e))?;
    }

    let body = into_json(&response, ITEM_FAILED)?;
    narrow_to_slug(body, slug).map(Json)
}

/// Replace a list-shaped `data` with the item whose slug matches exactly.
fn narrow_to_slug(mut body: Value, slug: &str) -> Result<Value, ProxyError> {
    let Some(items) = body.get("data").and_then(Value::as_array) else {
        return Ok(body);
    };
    let Some(item) = items
        .iter()
        .find(|item| item.get("slug").and_then(Value::as_str) == Some(slug))
        .cloned()
    else {
        return Err(ProxyError::NotFound("Case study not found"));
    };
    if let Some(object) = body.as_object_mut() {
        object.insert("data".to_owned(), item);
    }
    Ok(body)
}
