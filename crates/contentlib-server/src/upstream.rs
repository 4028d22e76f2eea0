//! Client for the upstream content API.
//!
//! [`Upstream`] is the seam the handlers talk to. [`HttpUpstream`] is the
//! production implementation on top of `reqwest`; tests plug in an
//! in-memory fake.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde_json::Value;

/// Errors that prevent a usable upstream response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamError {
    /// The request never got a response (DNS, connect, timeout, ...).
    #[error("{0}")]
    Transport(String),

    /// The response body is not valid JSON.
    #[error("{0}")]
    Decode(String),
}

/// A raw upstream response. Bodies are buffered; the proxy never streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    /// Canonical reason phrase for `status` (`"Not Found"`), or `""`.
    pub status_text: String,
    pub body: String,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Decode`] if the body is not valid JSON.
    pub fn json(&self) -> Result<Value, UpstreamError> {
        serde_json::from_str(&self.body).map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

/// Minimal HTTP surface needed by the proxy routes.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// `GET url`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Transport`] if no response was received.
    async fn get(&self, url: &str) -> Result<UpstreamResponse, UpstreamError>;

    /// `POST url` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Transport`] if no response was received.
    async fn post_json(&self, url: &str, body: &Value) -> Result<UpstreamResponse, UpstreamError>;
}

/// `reqwest`-backed upstream client. No caching, no retries.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
}

impl HttpUpstream {
    /// Build a client. `timeout` bounds each whole request when set.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Transport`] if the TLS backend fails to
    /// initialize.
    pub fn new(timeout: Option<Duration>) -> Result<Self, UpstreamError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| UpstreamError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<UpstreamResponse, UpstreamError> {
        let response = request
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        Ok(UpstreamResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_owned(),
            body,
        })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn get(&self, url: &str) -> Result<UpstreamResponse, UpstreamError> {
        self.send(self.client.get(url)).await
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<UpstreamResponse, UpstreamError> {
        let bytes = serde_json::to_vec(body).map_err(|e| UpstreamError::Decode(e.to_string()))?;
        self.send(self.client.post(url).body(bytes)).await
    }
}
