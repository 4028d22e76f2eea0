//! Privacy policy model and text rendering.
//!
//! The upstream record has no fixed schema. A record with a non-empty
//! `description` or `content` is [`PrivacyPolicy::Structured`]; anything
//! else falls back to [`PrivacyPolicy::Raw`], which keeps every string field
//! except bookkeeping ones so that nothing the editors wrote is lost.

use serde_json::{Map, Value};

/// Keys never shown in the raw fallback.
const HIDDEN_KEYS: [&str; 4] = ["id", "title", "created_at", "updated_at"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrivacyPolicy {
    Structured {
        title: Option<String>,
        description: Option<String>,
        content: Option<String>,
    },
    Raw {
        title: Option<String>,
        /// `(key, text)` pairs in key order.
        sections: Vec<(String, String)>,
    },
}

/// A renderable piece of policy text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Markup to render as HTML.
    Html(String),
    /// One trimmed plain-text paragraph.
    Paragraph(String),
}

/// A titled (or untitled) run of blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: Option<String>,
    pub blocks: Vec<Block>,
}

fn text_field(record: &Map<String, Value>, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_owned)
}

impl PrivacyPolicy {
    /// Pick the policy out of an envelope's `data`. An array yields its first
    /// record; an empty array, `null` or a scalar yields `None`.
    pub fn from_data(data: &Value) -> Option<Self> {
        let record = match data {
            Value::Array(records) => records.first()?.as_object()?,
            Value::Object(record) => record,
            _ => return None,
        };
        Some(Self::from_record(record))
    }

    fn from_record(record: &Map<String, Value>) -> Self {
        let title = text_field(record, "title");
        let description = text_field(record, "description");
        let content = text_field(record, "content");

        if description.is_some() || content.is_some() {
            return Self::Structured {
                title,
                description,
                content,
            };
        }

        let mut sections: Vec<(String, String)> = record
            .iter()
            .filter(|(key, _)| !HIDDEN_KEYS.contains(&key.as_str()))
            .filter_map(|(key, value)| Some((key.clone(), value.as_str()?.to_owned())))
            .collect();
        sections.sort_by(|a, b| a.0.cmp(&b.0));
        Self::Raw { title, sections }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Structured { title, .. } | Self::Raw { title, .. } => title.as_deref(),
        }
    }

    /// Body sections in display order. Structured policies render the
    /// description then the content without headings; raw policies get one
    /// heading per key.
    pub fn sections(&self) -> Vec<Section> {
        match self {
            Self::Structured {
                description,
                content,
                ..
            } => [description, content]
                .into_iter()
                .flatten()
                .map(|text| Section {
                    heading: None,
                    blocks: render_text(text),
                })
                .collect(),
            Self::Raw { sections, .. } => sections
                .iter()
                .map(|(key, text)| Section {
                    heading: Some(heading_for_key(key)),
                    blocks: render_text(text),
                })
                .collect(),
        }
    }
}

/// `privacy_contact_email` → `privacy contact email`.
pub fn heading_for_key(key: &str) -> String {
    key.replace('_', " ")
}

/// Whether `text` contains something that looks like an HTML tag: a `<`
/// followed by a letter, with a `>` somewhere after it.
pub fn looks_like_html(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.windows(2).enumerate().any(|(i, pair)| {
        pair[0] == b'<' && pair[1].is_ascii_alphabetic() && bytes[i + 2..].contains(&b'>')
    })
}

/// HTML text stays one block; plain text becomes one paragraph per
/// non-blank line.
pub fn render_text(text: &str) -> Vec<Block> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    if looks_like_html(text) {
        return vec![Block::Html(text.to_owned())];
    }
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| Block::Paragraph(line.to_owned()))
        .collect()
}
