//! Category and free-text filtering over a fetched listing.
//!
//! The category choices are derived from the data itself: distinct category
//! names in first-seen order, behind an always-present "All" choice.

use crate::model::ContentItem;

/// Label of the pseudo-category that disables category filtering.
pub const ALL_CATEGORIES: &str = "All";

/// Selected category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// Map a selected label back to a filter. The "All" label (any case) and
    /// blank input select everything.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || label.eq_ignore_ascii_case(ALL_CATEGORIES) {
            Self::All
        } else {
            Self::Named(label.to_owned())
        }
    }

    /// Label shown for this choice.
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Named(name) => name,
        }
    }

    pub fn matches(&self, item: &ContentItem) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => item.category_name() == name,
        }
    }
}

/// Normalized free-text query: trimmed and lowercased once up front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Substring match against title, short description and category name.
    pub fn matches(&self, item: &ContentItem) -> bool {
        if self.0.is_empty() {
            return true;
        }
        [
            item.title.as_str(),
            item.short_description.as_str(),
            item.category_name(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&self.0))
    }
}

/// Category choices for the filter control, "All" first.
pub fn category_options(items: &[ContentItem]) -> Vec<String> {
    let mut options = vec![ALL_CATEGORIES.to_owned()];
    for item in items {
        let name = item.category_name();
        if name.is_empty() || options.iter().any(|o| o == name) {
            continue;
        }
        options.push(name.to_owned());
    }
    options
}

/// Items passing both the category and the search predicate, in input order.
pub fn filter_items<'a>(
    items: &'a [ContentItem],
    category: &CategoryFilter,
    query: &SearchQuery,
) -> Vec<&'a ContentItem> {
    items
        .iter()
        .filter(|item| category.matches(item) && query.matches(item))
        .collect()
}
