//! Data source error types

use std::time::Duration;

/// Errors that can occur while fetching rows from a data source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP error response from the backend.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message (usually the response body).
        message: String,
    },

    /// Network error during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse the backend response.
    #[error("Response parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },

    /// Failure reported by a caller-provided source.
    #[error("{0}")]
    Custom(String),
}

impl SourceError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a new parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Creates an error for a caller-provided source.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this error is potentially retryable.
    ///
    /// The loader never retries on its own; this is for callers that
    /// offer a retry affordance.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Network(_) => true,
            Self::Timeout(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(SourceError::http(503, "unavailable").is_retryable());
        assert!(SourceError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(!SourceError::http(404, "not found").is_retryable());
        assert!(!SourceError::parse("bad json").is_retryable());
        assert!(!SourceError::custom("boom").is_retryable());
    }

    #[test]
    fn test_display() {
        assert_eq!(SourceError::http(500, "oops").to_string(), "HTTP 500: oops");
        assert_eq!(SourceError::custom("boom").to_string(), "boom");
        assert_eq!(SourceError::http(500, "oops").status_code(), Some(500));
    }
}
