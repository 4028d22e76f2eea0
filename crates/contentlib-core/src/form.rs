//! Lead and contact forms.
//!
//! Three forms share one contract: local guards (consent, loaded item,
//! required inputs) run before anything touches the network; the outcome of
//! a submission is always a single [`Notice`]; and on failure the form state
//! is left untouched so the user can retry.
//!
//! - [`DynamicLeadForm`] renders whatever fields the content item declares
//!   and, on success, opens the item's external link or downloads its file.
//! - [`LegacyLeadForm`] submits a fixed field set and resets to defaults.
//! - [`ContactForm`] feeds the generic contact endpoint.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::envelope::Envelope;
use crate::error::{FetchError, FormError};
use crate::model::{ContentItem, DynamicField, UtmParams};
use crate::source::ContentSource;
use crate::urls::UrlResolver;

/// Message the legacy form falls back to when the user leaves it blank.
pub const DEFAULT_LEAD_MESSAGE: &str = "I would like to download this case study.";

/// Success notification shown after any accepted submission.
pub const SUBMIT_SUCCESS: &str = "Thank you! Your request has been submitted successfully.";

// ── Payloads ─────────────────────────────────────────────────────────

/// Where the lead says it came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadSource {
    #[default]
    Download,
    Website,
    Referral,
    Social,
    Other,
}

impl LeadSource {
    pub const ALL: [Self; 5] = [
        Self::Download,
        Self::Website,
        Self::Referral,
        Self::Social,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Website => "website",
            Self::Referral => "referral",
            Self::Social => "social",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for LeadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|source| source.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown lead source '{s}' (expected download, website, referral, social or other)")
            })
    }
}

/// Lead with a free-form `data` map built from dynamic fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DynamicLead {
    pub case_study: u64,
    pub data: BTreeMap<String, String>,
}

/// Lead with the fixed legacy field set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixedLead {
    pub case_study: u64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    pub lead_source: LeadSource,
    pub message: String,
    #[serde(flatten)]
    pub utm: UtmParams,
}

/// Body of `POST /casestudy/case-study-leads`. The two shapes never mix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LeadPayload {
    Fixed(FixedLead),
    Dynamic(DynamicLead),
}

impl LeadPayload {
    pub fn case_study(&self) -> u64 {
        match self {
            Self::Fixed(lead) => lead.case_study,
            Self::Dynamic(lead) => lead.case_study,
        }
    }
}

/// Body of `POST /contact/contacts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub requirements: String,
    #[serde(flatten)]
    pub utm: UtmParams,
}

// ── Outcomes ─────────────────────────────────────────────────────────

/// The one user-visible notification a submission produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Self::Success(m) | Self::Error(m) => m,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Follow-up after a successful dynamic lead submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostSubmitAction {
    /// Open the item's external link in a new browsing context.
    OpenLink(String),
    /// Download the item's file from this absolute URL.
    Download(String),
}

/// Pick the follow-up for `item`: the external link wins over the file.
pub fn post_submit_action(item: &ContentItem, resolver: &UrlResolver) -> Option<PostSubmitAction> {
    if let Some(link) = item.external_link() {
        return Some(PostSubmitAction::OpenLink(link.to_owned()));
    }
    item.downloadable_file()
        .and_then(|file| resolver.resolve(file))
        .map(PostSubmitAction::Download)
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub notice: Notice,
    pub action: Option<PostSubmitAction>,
}

impl SubmitOutcome {
    fn succeeded(action: Option<PostSubmitAction>) -> Self {
        Self {
            notice: Notice::Success(SUBMIT_SUCCESS.to_owned()),
            action,
        }
    }

    fn failed(message: String) -> Self {
        Self {
            notice: Notice::Error(message),
            action: None,
        }
    }

    fn blocked(err: &FormError) -> Self {
        Self::failed(err.to_string())
    }

    pub fn is_success(&self) -> bool {
        self.notice.is_success()
    }
}

/// Collapse a submission response into `Ok` or the message to show.
fn acknowledge(result: Result<Envelope<Value>, FetchError>) -> Result<(), String> {
    match result.and_then(Envelope::into_ack) {
        Ok(message) => {
            info!(message = %message, "submission accepted");
            Ok(())
        }
        Err(err) => {
            warn!(error = %err, "submission failed");
            Err(err.describe_submission())
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

fn require(value: &str, field: &str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        return Err(FormError::MissingField {
            field: field.to_owned(),
        });
    }
    Ok(())
}

// ── Dynamic lead form ────────────────────────────────────────────────

/// Lead form driven by the item's [`DynamicField`] list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DynamicLeadForm {
    fields: Vec<DynamicField>,
    values: BTreeMap<u64, String>,
    agreed: bool,
}

impl DynamicLeadForm {
    /// Keep the active fields, ordered by `sequence` (stable for ties).
    pub fn new(fields: &[DynamicField]) -> Self {
        let mut fields: Vec<DynamicField> =
            fields.iter().filter(|f| f.is_active).cloned().collect();
        fields.sort_by_key(|f| f.sequence);
        Self {
            fields,
            values: BTreeMap::new(),
            agreed: false,
        }
    }

    pub fn for_item(item: &ContentItem) -> Self {
        Self::new(&item.dynamic_fields)
    }

    /// Fields to render, in order.
    pub fn fields(&self) -> &[DynamicField] {
        &self.fields
    }

    /// Set a field's value by id. Returns `false` for unknown or inactive fields.
    pub fn set_value(&mut self, field_id: u64, value: impl Into<String>) -> bool {
        if !self.fields.iter().any(|f| f.id == field_id) {
            return false;
        }
        self.values.insert(field_id, value.into());
        true
    }

    /// Set a field's value by its name (case-insensitive).
    pub fn set_value_by_name(&mut self, name: &str, value: impl Into<String>) -> bool {
        let Some(id) = self
            .fields
            .iter()
            .find(|f| f.field_name.eq_ignore_ascii_case(name.trim()))
            .map(|f| f.id)
        else {
            return false;
        };
        self.set_value(id, value)
    }

    pub fn value(&self, field_id: u64) -> &str {
        self.values.get(&field_id).map_or("", String::as_str)
    }

    pub fn set_agreed(&mut self, agreed: bool) {
        self.agreed = agreed;
    }

    pub fn agreed(&self) -> bool {
        self.agreed
    }

    /// Run the local guards and build the submission body.
    ///
    /// Every field is a required input, so an untouched field blocks the
    /// submission. Values are trimmed and those that end up empty are left
    /// out of `data`.
    ///
    /// # Errors
    ///
    /// [`FormError::ConsentRequired`], [`FormError::ItemNotLoaded`] or
    /// [`FormError::MissingField`], checked in that order.
    pub fn payload(&self, item: Option<&ContentItem>) -> Result<LeadPayload, FormError> {
        if !self.agreed {
            return Err(FormError::ConsentRequired);
        }
        let Some(item) = item else {
            return Err(FormError::ItemNotLoaded);
        };
        if let Some(field) = self.fields.iter().find(|f| self.value(f.id).is_empty()) {
            return Err(FormError::MissingField {
                field: field.field_name.clone(),
            });
        }

        let data = self
            .fields
            .iter()
            .filter_map(|f| non_empty(self.value(f.id)).map(|v| (f.field_name.clone(), v)))
            .collect();
        Ok(LeadPayload::Dynamic(DynamicLead {
            case_study: item.id,
            data,
        }))
    }

    fn reset(&mut self) {
        self.values.clear();
        self.agreed = false;
    }

    /// Submit through `source`. On success the form is cleared and the
    /// follow-up action (link or download) is returned with the notice.
    pub async fn submit(
        &mut self,
        source: &dyn ContentSource,
        item: Option<&ContentItem>,
        resolver: &UrlResolver,
    ) -> SubmitOutcome {
        let payload = match self.payload(item) {
            Ok(payload) => payload,
            Err(err) => return SubmitOutcome::blocked(&err),
        };
        match acknowledge(source.submit_lead(&payload).await) {
            Ok(()) => {
                self.reset();
                SubmitOutcome::succeeded(item.and_then(|i| post_submit_action(i, resolver)))
            }
            Err(message) => SubmitOutcome::failed(message),
        }
    }
}

// ── Legacy lead form ─────────────────────────────────────────────────

/// Lead form with a fixed field set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyLeadForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub job_title: String,
    pub lead_source: LeadSource,
    pub message: String,
    pub agreed: bool,
    pub utm: UtmParams,
}

impl Default for LegacyLeadForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            company: String::new(),
            job_title: String::new(),
            lead_source: LeadSource::default(),
            message: DEFAULT_LEAD_MESSAGE.to_owned(),
            agreed: false,
            utm: UtmParams::default(),
        }
    }
}

impl LegacyLeadForm {
    /// Empty form carrying the UTM parameters of the current page.
    pub fn with_utm(utm: UtmParams) -> Self {
        Self {
            utm,
            ..Self::default()
        }
    }

    /// # Errors
    ///
    /// [`FormError::ConsentRequired`], [`FormError::ItemNotLoaded`], or
    /// [`FormError::MissingField`] for a blank name or email.
    pub fn payload(&self, item: Option<&ContentItem>) -> Result<LeadPayload, FormError> {
        if !self.agreed {
            return Err(FormError::ConsentRequired);
        }
        let Some(item) = item else {
            return Err(FormError::ItemNotLoaded);
        };
        require(&self.name, "Full Name")?;
        require(&self.email, "Email")?;

        Ok(LeadPayload::Fixed(FixedLead {
            case_study: item.id,
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            phone: non_empty(&self.phone),
            company: non_empty(&self.company),
            job_title: non_empty(&self.job_title),
            lead_source: self.lead_source,
            message: non_empty(&self.message).unwrap_or_else(|| DEFAULT_LEAD_MESSAGE.to_owned()),
            utm: self.utm.clone(),
        }))
    }

    fn reset(&mut self) {
        *self = Self::with_utm(std::mem::take(&mut self.utm));
    }

    pub async fn submit(
        &mut self,
        source: &dyn ContentSource,
        item: Option<&ContentItem>,
    ) -> SubmitOutcome {
        let payload = match self.payload(item) {
            Ok(payload) => payload,
            Err(err) => return SubmitOutcome::blocked(&err),
        };
        match acknowledge(source.submit_lead(&payload).await) {
            Ok(()) => {
                self.reset();
                SubmitOutcome::succeeded(None)
            }
            Err(message) => SubmitOutcome::failed(message),
        }
    }
}

// ── Contact form ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub requirements: String,
    pub agreed: bool,
    pub utm: UtmParams,
}

impl ContactForm {
    /// # Errors
    ///
    /// [`FormError::ConsentRequired`], or [`FormError::MissingField`] for a
    /// blank name or email.
    pub fn payload(&self) -> Result<ContactSubmission, FormError> {
        if !self.agreed {
            return Err(FormError::ConsentRequired);
        }
        require(&self.full_name, "Name")?;
        require(&self.email, "Email")?;

        Ok(ContactSubmission {
            full_name: self.full_name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            phone: non_empty(&self.phone),
            company: non_empty(&self.company),
            requirements: self.requirements.trim().to_owned(),
            utm: self.utm.clone(),
        })
    }

    pub async fn submit(&mut self, source: &dyn ContentSource) -> SubmitOutcome {
        let payload = match self.payload() {
            Ok(payload) => payload,
            Err(err) => return SubmitOutcome::blocked(&err),
        };
        match acknowledge(source.submit_contact(&payload).await) {
            Ok(()) => {
                let utm = std::mem::take(&mut self.utm);
                *self = Self {
                    utm,
                    ..Self::default()
                };
                SubmitOutcome::succeeded(None)
            }
            Err(message) => SubmitOutcome::failed(message),
        }
    }
}
