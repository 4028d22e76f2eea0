//! HTTP error types for the proxy.
//!
//! Every failure leaves the proxy as a JSON envelope with `status: false`,
//! a `message`, and (when there is detail to give) an `error` string.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use tracing::{error, warn};

use contentlib_core::envelope::Envelope;

/// Error returned from proxy handlers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProxyError {
    /// A required path parameter is missing or blank.
    #[error("{0}")]
    BadRequest(&'static str),

    /// The request line could not be decoded (bad query string or path segment).
    #[error("Invalid request")]
    Malformed(String),

    /// The requested item does not exist.
    #[error("{0}")]
    NotFound(&'static str),

    /// The upstream answered with a non-success status; it is mirrored.
    #[error("API responded with status {status}")]
    Upstream { status: u16, error: String },

    /// The upstream could not be reached or its response could not be used.
    #[error("{message}")]
    Internal { message: &'static str, error: String },
}

impl ProxyError {
    /// Wrap an unexpected failure under a resource-specific message.
    pub fn internal(message: &'static str, err: &impl std::fmt::Display) -> Self {
        Self::Internal {
            message,
            error: err.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Malformed(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> Option<String> {
        match self {
            Self::BadRequest(_) | Self::NotFound(_) => None,
            Self::Malformed(error)
            | Self::Upstream { error, .. }
            | Self::Internal { error, .. } => Some(error.clone()),
        }
    }
}

impl From<QueryRejection> for ProxyError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

impl From<PathRejection> for ProxyError {
    fn from(rejection: PathRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.detail();

        if status.is_server_error() {
            error!(status = status.as_u16(), error = ?detail, reason = %self, "proxy request failed");
        } else {
            warn!(status = status.as_u16(), error = ?detail, reason = %self, "proxy request rejected");
        }

        let body: Envelope<Value> = Envelope::failure(self.to_string(), detail);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_is_mirrored() {
        let err = ProxyError::Upstream {
            status: 404,
            error: "Not Found".to_owned(),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "API responded with status 404");
    }

    #[test]
    fn invalid_upstream_status_becomes_bad_gateway() {
        let err = ProxyError::Upstream {
            status: 42,
            error: String::new(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn malformed_request_is_a_bad_request_with_detail() {
        let err = ProxyError::Malformed("Invalid URL".to_owned());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid request");
        assert_eq!(err.detail().as_deref(), Some("Invalid URL"));
    }

    #[test]
    fn internal_keeps_underlying_text() {
        let err = ProxyError::internal("Failed to fetch case studies", &"connection refused");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to fetch case studies");
        assert_eq!(err.detail().as_deref(), Some("connection refused"));
    }
}
