//! Content model as served by the upstream content API.
//!
//! The upstream is loose about nulls, so most scalar fields deserialize
//! through [`null_as_default`]: a missing or `null` value becomes the type's
//! default instead of failing the whole item. Unknown fields are ignored.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize `null` (or a missing field, with `#[serde(default)]`) as `T::default()`.
///
/// # Errors
///
/// Returns the deserializer's error when the value is present but has the
/// wrong shape.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_true() -> bool {
    true
}

/// Like [`null_as_default`], but a missing or `null` flag reads as `true`.
fn null_as_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// Content category, used for display and filtering only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub is_active: bool,
}

/// A server-declared lead form input.
///
/// `field_name` doubles as the label and the submission key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicField {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub field_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub placeholder: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sequence: i64,
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub is_active: bool,
}

/// A gated content item (case study or eBook).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub short_title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default)]
    pub author_username: Option<String>,
    #[serde(default)]
    pub author_full_name: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default)]
    pub banner_image: Option<String>,
    #[serde(default)]
    pub mobile_image: Option<String>,
    #[serde(default)]
    pub logo_image: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub client_industry: Option<String>,
    #[serde(default)]
    pub estimated_time: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_featured: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_pinned: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub views_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shares_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub downloads_count: u64,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dynamic_fields: Vec<DynamicField>,
    #[serde(default)]
    pub external_link: Option<String>,
    #[serde(default)]
    pub downloadable_file: Option<String>,
}

impl ContentItem {
    /// Category name, or `""` when the item has no category.
    pub fn category_name(&self) -> &str {
        self.category.as_ref().map_or("", |c| c.name.as_str())
    }

    /// External link, if present and not blank.
    pub fn external_link(&self) -> Option<&str> {
        non_blank(self.external_link.as_deref())
    }

    /// Downloadable file path or URL, if present and not blank.
    pub fn downloadable_file(&self) -> Option<&str> {
        non_blank(self.downloadable_file.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Identifies a content item on a detail screen.
///
/// A path segment made only of ASCII digits is an id; anything else is a slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentKey {
    Id(u64),
    Slug(String),
}

impl ContentKey {
    /// Classify a detail-path segment.
    pub fn parse(segment: &str) -> Self {
        let segment = segment.trim();
        if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = segment.parse() {
                return Self::Id(id);
            }
        }
        Self::Slug(segment.to_owned())
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Slug(slug) => f.write_str(slug),
        }
    }
}

/// Campaign-tracking parameters captured from the page URL.
///
/// Empty values are dropped on capture so they are never submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UtmParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_refcode: Option<String>,
}

impl UtmParams {
    /// Capture from a raw query string (with or without the leading `?`).
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_ref() {
                "utm_source" => &mut params.utm_source,
                "utm_medium" => &mut params.utm_medium,
                "utm_campaign" => &mut params.utm_campaign,
                "utm_refcode" => &mut params.utm_refcode,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.to_owned());
            }
        }
        params
    }

    /// Capture from a full page URL. Unparsable URLs yield no parameters.
    pub fn from_url(page_url: &str) -> Self {
        url::Url::parse(page_url)
            .ok()
            .and_then(|u| u.query().map(Self::from_query))
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn item_tolerates_nulls_and_unknown_fields() {
        let item: ContentItem = serde_json::from_value(serde_json::json!({
            "id": 7,
            "title": "Rugged scanners",
            "slug": "rugged-scanners",
            "short_description": null,
            "views_count": null,
            "dynamic_fields": null,
            "category": {"id": 1, "name": "Hardware", "slug": "hardware", "is_active": true},
            "brand_new_field": {"nested": true}
        }))
        .unwrap();

        assert_eq!(item.short_description, "");
        assert_eq!(item.views_count, 0);
        assert!(item.dynamic_fields.is_empty());
        assert_eq!(item.category_name(), "Hardware");
    }

    #[test]
    fn null_active_flags_read_as_active() {
        let item: ContentItem = serde_json::from_value(serde_json::json!({
            "id": 3,
            "category": {"id": 1, "name": "Hardware", "is_active": null},
            "dynamic_fields": [
                {"id": 101, "field_name": "Full Name", "sequence": 1, "is_active": null},
                {"id": 102, "field_name": "Fax", "sequence": 2, "is_active": false},
                {"id": 103, "field_name": "Email", "sequence": 3}
            ]
        }))
        .unwrap();

        assert!(item.category.as_ref().is_some_and(|c| c.is_active));
        let active: Vec<bool> = item.dynamic_fields.iter().map(|f| f.is_active).collect();
        assert_eq!(active, [true, false, true]);
    }

    #[test]
    fn blank_links_are_absent() {
        let item: ContentItem = serde_json::from_value(serde_json::json!({
            "id": 1,
            "external_link": "   ",
            "downloadable_file": "/media/file.pdf"
        }))
        .unwrap();
        assert_eq!(item.external_link(), None);
        assert_eq!(item.downloadable_file(), Some("/media/file.pdf"));
    }

    #[test]
    fn numeric_segments_are_ids() {
        assert_eq!(ContentKey::parse("42"), ContentKey::Id(42));
        assert_eq!(
            ContentKey::parse("honeywell-granit"),
            ContentKey::Slug("honeywell-granit".to_owned())
        );
        assert_eq!(ContentKey::parse("4a2"), ContentKey::Slug("4a2".to_owned()));
        // Too large for u64, so it can only be a slug.
        assert_eq!(
            ContentKey::parse("99999999999999999999999"),
            ContentKey::Slug("99999999999999999999999".to_owned())
        );
    }

    #[test]
    fn utm_capture_skips_empty_values() {
        let utm = UtmParams::from_url(
            "https://example.com/case-studies/9?utm_source=linkedin&utm_medium=&utm_campaign=q3%20push",
        );
        assert_eq!(utm.utm_source.as_deref(), Some("linkedin"));
        assert_eq!(utm.utm_medium, None);
        assert_eq!(utm.utm_campaign.as_deref(), Some("q3 push"));
        assert_eq!(utm.utm_refcode, None);

        let json = serde_json::to_value(&utm).unwrap();
        assert!(json.get("utm_medium").is_none());
    }
}
