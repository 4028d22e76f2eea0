//! URL helpers shared by the proxy and the client.

use url::Url;

/// Default upstream/image base when nothing is configured.
pub const DEFAULT_API_BASE_URL: &str = "https://api.martech-influence.com/api";

/// Strip trailing slashes so `{base}/{path}` never doubles them.
pub fn normalize_base_url(base: &str) -> &str {
    base.trim().trim_end_matches('/')
}

/// Whether `path` is already an absolute `http(s)` URL.
pub fn is_absolute(path: &str) -> bool {
    Url::parse(path).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

/// Resolves relative media paths (images, downloadable files) against the
/// public media base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlResolver {
    base: String,
}

impl Default for UrlResolver {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

impl UrlResolver {
    pub fn new(base: &str) -> Self {
        Self {
            base: normalize_base_url(base).to_owned(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Absolute URL for `path`; `None` for a blank path.
    pub fn resolve(&self, path: &str) -> Option<String> {
        let path = path.trim();
        if path.is_empty() {
            return None;
        }
        if is_absolute(path) {
            return Some(path.to_owned());
        }
        Some(format!("{}/{}", self.base, path.trim_start_matches('/')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_are_joined_once() {
        let resolver = UrlResolver::new("https://media.example.com/api/");
        assert_eq!(
            resolver.resolve("/media/banners/a.png").as_deref(),
            Some("https://media.example.com/api/media/banners/a.png")
        );
        assert_eq!(
            resolver.resolve("media/banners/a.png").as_deref(),
            Some("https://media.example.com/api/media/banners/a.png")
        );
    }

    #[test]
    fn absolute_and_blank_paths() {
        let resolver = UrlResolver::default();
        assert_eq!(
            resolver.resolve("https://cdn.example.com/x.pdf").as_deref(),
            Some("https://cdn.example.com/x.pdf")
        );
        assert_eq!(resolver.resolve("   "), None);
        assert!(!is_absolute("/media/x.pdf"));
        assert!(!is_absolute("mailto:sales@example.com"));
    }

    #[test]
    fn trailing_slashes_are_normalized() {
        assert_eq!(
            normalize_base_url("https://api.example.com/api/"),
            normalize_base_url("https://api.example.com/api")
        );
    }
}
