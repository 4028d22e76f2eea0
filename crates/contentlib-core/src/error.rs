//! Error types for `contentlib-core`.
//!
//! [`FetchError`] covers everything that can go wrong between a screen and
//! the proxy. [`FormError`] covers the local guards a form applies before it
//! is allowed to touch the network.

/// Errors from reading or submitting through a [`ContentSource`](crate::source::ContentSource).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The proxy answered with a non-success HTTP status.
    #[error("HTTP {status} {status_text}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status.
        status_text: String,
        /// `message` field of the error envelope, when one could be parsed.
        message: Option<String>,
    },

    /// The envelope came back without `status: true` (or without data).
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The request never produced a response.
    #[error("network error: {0}")]
    Transport(String),

    /// The response body was not the JSON we expected.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl FetchError {
    /// Human-readable message for a failed read of `resource`.
    pub fn describe(&self, resource: &str) -> String {
        match self {
            Self::Http { status_text, .. } => format!("Failed to fetch {resource}: {status_text}"),
            Self::Rejected(message) if !message.trim().is_empty() => message.clone(),
            Self::Rejected(_) => format!("Failed to fetch {resource}"),
            Self::Transport(message) | Self::Decode(message) if !message.trim().is_empty() => {
                message.clone()
            }
            Self::Transport(_) | Self::Decode(_) => {
                format!("An error occurred while fetching {resource}")
            }
        }
    }

    /// Human-readable message for a failed form submission.
    pub fn describe_submission(&self) -> String {
        match self {
            Self::Http {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Self::Http { status_text, .. } => format!("Failed to submit form: {status_text}"),
            Self::Rejected(message) if !message.trim().is_empty() => message.clone(),
            Self::Rejected(_) => "Failed to submit form".to_owned(),
            Self::Transport(message) | Self::Decode(message) if !message.trim().is_empty() => {
                message.clone()
            }
            Self::Transport(_) | Self::Decode(_) => {
                "An error occurred while submitting the form".to_owned()
            }
        }
    }
}

/// Local validation failures that block a form submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// The consent checkbox is not ticked.
    #[error("Please agree to the privacy policy to continue.")]
    ConsentRequired,

    /// The content item the form belongs to has not loaded yet.
    #[error("Case study data not loaded. Please refresh the page.")]
    ItemNotLoaded,

    /// A required input was left empty.
    #[error("{field} is required")]
    MissingField { field: String },
}
