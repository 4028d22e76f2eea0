//! Shared application state for the proxy.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::endpoints::Endpoints;
use crate::upstream::Upstream;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Client for the upstream content API.
    pub upstream: Arc<dyn Upstream>,
    /// Upstream URL builder.
    pub endpoints: Endpoints,
}

impl AppState {
    pub fn new(upstream: Arc<dyn Upstream>, base_url: &str) -> Self {
        Self {
            upstream,
            endpoints: Endpoints::new(base_url),
        }
    }

    pub fn from_config(upstream: Arc<dyn Upstream>, config: &ServerConfig) -> Self {
        Self::new(upstream, &config.upstream_base_url)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("upstream_base_url", &self.endpoints.base())
            .finish_non_exhaustive()
    }
}
