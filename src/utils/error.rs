//! Error types for the review crawler
//!
//! This module defines the fetch error shared by the crawler and the scraper.

use thiserror::Error;

/// Errors that can occur during HTTP fetching operations
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error (connection refused, reset, body read failure)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Server answered with a status configured for retry
    #[error("Server error: {0}")]
    ServerError(u16),

    /// Maximum retry attempts exceeded
    #[error("Maximum retry attempts exceeded after {attempts} attempts: {last}")]
    MaxRetriesExceeded { attempts: u32, last: String },

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Header value rejected by the HTTP client
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Invalid request rate configuration
    #[error("Invalid rate limit: {0}")]
    RateLimit(String),
}

impl FetchError {
    /// Whether another attempt at the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_connect() || e.is_request() || e.is_body() || e.is_timeout(),
            Self::Timeout | Self::ServerError(_) => true,
            Self::MaxRetriesExceeded { .. }
            | Self::InvalidUrl(_)
            | Self::InvalidHeader(_)
            | Self::RateLimit(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_variants() {
        assert!(FetchError::Timeout.is_retryable());
        assert!(FetchError::ServerError(502).is_retryable());
        assert!(!FetchError::InvalidUrl("nope".into()).is_retryable());
        assert!(!FetchError::MaxRetriesExceeded {
            attempts: 4,
            last: "Server error: 500".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_display() {
        let err = FetchError::ServerError(504);
        assert_eq!(err.to_string(), "Server error: 504");
    }
}
