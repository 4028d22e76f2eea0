//! Content proxy entry point.
//!
//! Loads configuration, builds the upstream client, then starts the Axum
//! HTTP server with graceful shutdown.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use contentlib_server::config::ServerConfig;
use contentlib_server::routes;
use contentlib_server::state::AppState;
use contentlib_server::upstream::HttpUpstream;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!(
        upstream = %config.upstream_base_url,
        timeout_secs = config.upstream_timeout.map(|t| t.as_secs()),
        "content proxy starting"
    );

    let upstream = HttpUpstream::new(config.upstream_timeout)
        .context("failed to initialize upstream client")?;
    let state = Arc::new(AppState::from_config(Arc::new(upstream), &config));

    let app = build_router(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "content proxy listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("content proxy stopped");
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    routes::router(state).layer(TraceLayer::new_for_http())
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
