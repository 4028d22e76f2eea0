//! The seam between screens and the proxy.
//!
//! Implementations return `Err` only when no usable envelope came back
//! (transport failure, non-success HTTP status, undecodable body). A
//! decoded envelope is handed over as-is, so `status: false` bodies are
//! judged by the caller through [`Envelope::into_data`] / [`Envelope::into_ack`].

use serde_json::Value;

use crate::envelope::Envelope;
use crate::error::FetchError;
use crate::form::{ContactSubmission, LeadPayload};
use crate::model::{ContentItem, ContentKey};

/// Read and submit operations offered by the proxy.
#[async_trait::async_trait]
pub trait ContentSource: Send + Sync {
    /// One page of the content listing.
    async fn list(&self, page: u32) -> Result<Envelope<Vec<ContentItem>>, FetchError>;

    /// A single item by id or slug.
    async fn item(&self, key: &ContentKey) -> Result<Envelope<ContentItem>, FetchError>;

    /// Privacy policy record(s); `data` may be an object or an array.
    async fn privacy_policy(&self) -> Result<Envelope<Value>, FetchError>;

    /// Submit a lead for a content item.
    async fn submit_lead(&self, payload: &LeadPayload) -> Result<Envelope<Value>, FetchError>;

    /// Submit the generic contact form.
    async fn submit_contact(
        &self,
        payload: &ContactSubmission,
    ) -> Result<Envelope<Value>, FetchError>;
}
