//! HTTP client for the content proxy.
//!
//! Implements [`ContentSource`] over the proxy's `/api` surface. Non-success
//! statuses become [`FetchError::Http`] with the envelope message attached
//! when the error body has one.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use contentlib_core::envelope::Envelope;
use contentlib_core::error::FetchError;
use contentlib_core::form::{ContactSubmission, LeadPayload};
use contentlib_core::model::{ContentItem, ContentKey};
use contentlib_core::source::ContentSource;
use contentlib_core::urls::normalize_base_url;

pub struct ProxyClient {
    http: reqwest::Client,
    addr: String,
}

impl ProxyClient {
    pub fn new(addr: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            addr: normalize_base_url(addr).to_owned(),
        }
    }

    /// Underlying HTTP client, shared with file downloads.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.addr)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>, FetchError> {
        let resp = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        handle_response(resp).await
    }

    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope<Value>, FetchError> {
        let resp = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        handle_response(resp).await
    }
}

async fn handle_response<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<Envelope<T>, FetchError> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    if !status.is_success() {
        let message = serde_json::from_str::<Envelope<Value>>(&body)
            .ok()
            .map(|envelope| envelope.message)
            .filter(|m| !m.trim().is_empty());
        return Err(FetchError::Http {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_owned(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
}

/// Proxy path for a detail lookup.
fn item_path(key: &ContentKey) -> String {
    match key {
        ContentKey::Id(id) => format!("/casestudy/case-studies/{id}"),
        ContentKey::Slug(slug) => {
            format!("/casestudy/case-studies/slug/{}", urlencoding::encode(slug))
        }
    }
}

#[async_trait]
impl ContentSource for ProxyClient {
    async fn list(&self, page: u32) -> Result<Envelope<Vec<ContentItem>>, FetchError> {
        self.get(&format!("/casestudy/case-studies?page={page}")).await
    }

    async fn item(&self, key: &ContentKey) -> Result<Envelope<ContentItem>, FetchError> {
        self.get(&item_path(key)).await
    }

    async fn privacy_policy(&self) -> Result<Envelope<Value>, FetchError> {
        self.get("/privacy-policy/list").await
    }

    async fn submit_lead(&self, payload: &LeadPayload) -> Result<Envelope<Value>, FetchError> {
        self.post("/casestudy/case-study-leads", payload).await
    }

    async fn submit_contact(
        &self,
        payload: &ContactSubmission,
    ) -> Result<Envelope<Value>, FetchError> {
        self.post("/contact/contacts", payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_keys_use_id_route() {
        assert_eq!(
            item_path(&ContentKey::parse("42")),
            "/casestudy/case-studies/42"
        );
        assert_eq!(
            item_path(&ContentKey::parse("edge servers")),
            "/casestudy/case-studies/slug/edge%20servers"
        );
    }

    #[test]
    fn urls_carry_api_prefix() {
        let client = ProxyClient::new("http://127.0.0.1:3000/");
        assert_eq!(
            client.url("/privacy-policy/list"),
            "http://127.0.0.1:3000/api/privacy-policy/list"
        );
    }
}
