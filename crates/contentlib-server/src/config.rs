//! Server configuration for the content proxy.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::net::SocketAddr;
use std::time::Duration;

use contentlib_core::urls::{DEFAULT_API_BASE_URL, normalize_base_url};

/// Port used when neither `CONTENTLIB_BIND_ADDR` nor `PORT` is set.
const DEFAULT_PORT: u16 = 3000;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Base URL of the upstream content API, without a trailing slash.
    pub upstream_base_url: String,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
    /// Per-request timeout for upstream calls. `None` waits indefinitely.
    pub upstream_timeout: Option<Duration>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CONTENTLIB_BIND_ADDR` — full bind address (default: `127.0.0.1:3000`)
    /// - `PORT` — port to bind on `0.0.0.0` (used when `CONTENTLIB_BIND_ADDR` is unset)
    /// - `API_URL`, then `PUBLIC_API_URL` — upstream base URL
    ///   (default: `https://api.martech-influence.com/api`)
    /// - `CONTENTLIB_LOG_LEVEL` — log filter (default: `info`)
    /// - `CONTENTLIB_UPSTREAM_TIMEOUT` — upstream timeout in seconds (default: none)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // Priority: CONTENTLIB_BIND_ADDR > PORT > default 127.0.0.1:3000
        let bind_addr = if let Some(addr) = var("CONTENTLIB_BIND_ADDR") {
            addr.trim()
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)))
        } else if let Some(port_str) = var("PORT") {
            let port: u16 = port_str.trim().parse().unwrap_or(DEFAULT_PORT);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT))
        };

        let upstream_base_url = var("API_URL")
            .or_else(|| var("PUBLIC_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());

        let log_level = var("CONTENTLIB_LOG_LEVEL").unwrap_or_else(|| "info".to_owned());

        let upstream_timeout = var("CONTENTLIB_UPSTREAM_TIMEOUT")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            bind_addr,
            upstream_base_url: normalize_base_url(&upstream_base_url).to_owned(),
            log_level,
            upstream_timeout,
        }
    }
}
