//! Upstream URL construction.

use contentlib_core::urls::normalize_base_url;

/// Builds upstream URLs from the configured base.
///
/// The base is normalized once, so a base with or without a trailing `/`
/// produces identical URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base: &str) -> Self {
        Self {
            base: normalize_base_url(base).to_owned(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// `{base}/casestudy/case-studies/?page={page}`
    pub fn case_studies(&self, page: &str) -> String {
        format!(
            "{}/casestudy/case-studies/?page={}",
            self.base,
            urlencoding::encode(page)
        )
    }

    /// `{base}/casestudy/case-studies/{id_or_slug}/`
    pub fn case_study(&self, id_or_slug: &str) -> String {
        format!(
            "{}/casestudy/case-studies/{}/",
            self.base,
            urlencoding::encode(id_or_slug)
        )
    }

    /// `{base}/casestudy/case-studies/?slug={slug}`
    pub fn case_study_by_slug(&self, slug: &str) -> String {
        format!(
            "{}/casestudy/case-studies/?slug={}",
            self.base,
            urlencoding::encode(slug)
        )
    }

    pub fn case_study_leads(&self) -> String {
        format!("{}/casestudy/case-study-leads/", self.base)
    }

    pub fn contacts(&self) -> String {
        format!("{}/contact/contacts/", self.base)
    }

    pub fn privacy_policy(&self) -> String {
        format!("{}/privacy-policy/list/", self.base)
    }
}
