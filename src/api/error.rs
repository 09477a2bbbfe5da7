//! Error types for backend calls.

use thiserror::Error;

/// Failure of a single backend call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure or unreadable response body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Base URL or joined path is not a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Response body did not match the expected shape.
    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Backend answered with a non-success status.
    #[error("Backend error ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Backend {
        /// HTTP status code.
        status: u16,
        /// `detail` field of the error body, when the backend sent one.
        detail: Option<String>,
    },
}

impl ApiError {
    /// Text to show the user: the backend detail when present, else `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Backend {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => detail.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Result type alias for backend calls.
pub type Result<T> = std::result::Result<T, ApiError>;
