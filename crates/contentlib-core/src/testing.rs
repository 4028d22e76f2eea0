//! In-memory [`ContentSource`] and fixtures for unit tests.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{Value, json};

use crate::envelope::Envelope;
use crate::error::FetchError;
use crate::form::{ContactSubmission, LeadPayload};
use crate::model::{ContentItem, ContentKey, DynamicField};
use crate::source::ContentSource;

type Reply<T> = Option<Result<Envelope<T>, FetchError>>;

/// Canned responses per operation; unconfigured operations fail with a
/// transport error. Every call is counted and submissions are recorded.
#[derive(Default)]
pub struct FakeSource {
    pub listing: Reply<Vec<ContentItem>>,
    pub item: Reply<ContentItem>,
    pub privacy: Reply<Value>,
    pub submit: Reply<Value>,
    pub calls: AtomicUsize,
    pub leads: Mutex<Vec<LeadPayload>>,
    pub contacts: Mutex<Vec<ContactSubmission>>,
}

impl FakeSource {
    fn reply<T: Clone>(&self, reply: &Reply<T>) -> Result<Envelope<T>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        reply
            .clone()
            .unwrap_or_else(|| Err(FetchError::Transport("not configured".to_owned())))
    }
}

#[async_trait::async_trait]
impl ContentSource for FakeSource {
    async fn list(&self, _page: u32) -> Result<Envelope<Vec<ContentItem>>, FetchError> {
        self.reply(&self.listing)
    }

    async fn item(&self, _key: &ContentKey) -> Result<Envelope<ContentItem>, FetchError> {
        self.reply(&self.item)
    }

    async fn privacy_policy(&self) -> Result<Envelope<Value>, FetchError> {
        self.reply(&self.privacy)
    }

    async fn submit_lead(&self, payload: &LeadPayload) -> Result<Envelope<Value>, FetchError> {
        self.leads.lock().unwrap().push(payload.clone());
        self.reply(&self.submit)
    }

    async fn submit_contact(
        &self,
        payload: &ContactSubmission,
    ) -> Result<Envelope<Value>, FetchError> {
        self.contacts.lock().unwrap().push(payload.clone());
        self.reply(&self.submit)
    }
}

pub fn field(id: u64, name: &str, sequence: i64, is_active: bool) -> DynamicField {
    DynamicField {
        id,
        field_name: name.to_owned(),
        placeholder: format!("Enter {}", name.to_lowercase()),
        sequence,
        is_active,
    }
}

/// Item 12 with three active dynamic fields and no follow-up link or file.
pub fn sample_item() -> ContentItem {
    serde_json::from_value(json!({
        "id": 12,
        "title": "Granit Ultra Series",
        "slug": "granit-ultra-series",
        "short_description": "Rugged scanners for cold-chain warehouses",
        "content": "<p>Full story.</p>",
        "category": {"id": 3, "name": "Hardware", "slug": "hardware"},
        "dynamic_fields": [
            {"id": 102, "field_name": "Work Email", "sequence": 2, "is_active": true},
            {"id": 101, "field_name": "Full Name", "sequence": 1, "is_active": true},
            {"id": 103, "field_name": "Company", "sequence": 3, "is_active": true}
        ]
    }))
    .unwrap()
}

pub fn item_envelope(item: ContentItem) -> Envelope<ContentItem> {
    Envelope {
        status: true,
        data: Some(item),
        ..Envelope::failure("Case study fetched successfully", None)
    }
}

/// A successful submission acknowledgement.
pub fn accepted() -> Envelope<Value> {
    Envelope {
        status: true,
        ..Envelope::failure("Lead submitted successfully", None)
    }
}
