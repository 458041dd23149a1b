//! HTTP fetcher with retry, backoff and optional rate limiting
//!
//! This module provides the page fetcher shared by link discovery and review
//! scraping:
//! - Fixed User-Agent header, no cookies
//! - Per-request timeout
//! - Retry with exponential backoff on connection/read failures and a
//!   configured set of server error statuses
//! - Optional requests-per-second limit with governor
//!
//! Any status outside the retry set, client errors included, is returned as a
//! normal body. Fetch failures come back as [`FetchError`] values and never
//! escape as panics.

use async_trait::async_trait;
use bytes::Bytes;
use encoding_rs::{Encoding, UTF_8};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::{
    header::{HeaderMap, HeaderValue, USER_AGENT},
    Client,
};
use std::num::NonZeroU32;
use url::Url;

use crate::config::FetcherConfig;
use crate::utils::error::FetchError;
use crate::utils::retry::{with_retry_if, RetryConfig};

/// Source of raw page bytes
///
/// The crawl controller and the batch scraper only depend on this trait, so
/// tests can serve pages from memory.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch the raw body of `url`
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError>;
}

#[async_trait]
impl<T: Fetch + ?Sized> Fetch for std::sync::Arc<T> {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        (**self).fetch(url).await
    }
}

/// Review site fetcher backed by reqwest
pub struct HttpFetcher {
    /// HTTP client with configured timeout and compression
    client: Client,

    /// Fixed identity headers sent with every request
    headers: HeaderMap,

    /// Backoff policy
    retry: RetryConfig,

    /// Status codes that trigger a retry
    retry_statuses: Vec<u16>,

    /// Optional rate limiter to control request frequency
    rate_limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl HttpFetcher {
    /// Create a fetcher with the default identity, timeout and retry policy
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(&FetcherConfig::default())
    }

    /// Create a fetcher from configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created and
    /// `FetchError::InvalidHeader` if the user agent is not a valid header value
    pub fn with_config(config: &FetcherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .gzip(true)
            .build()?;

        let mut headers = HeaderMap::new();
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| FetchError::InvalidHeader(format!("user agent: {e}")))?;
        headers.insert(USER_AGENT, user_agent);

        let rate_limiter = match config.requests_per_second {
            0 => None,
            rps => {
                let rate = NonZeroU32::new(rps)
                    .ok_or_else(|| FetchError::RateLimit(format!("{rps} requests per second")))?;
                Some(RateLimiter::direct(Quota::per_second(rate)))
            }
        };

        Ok(Self {
            client,
            headers,
            retry: RetryConfig {
                max_retries: config.max_retries,
                base_delay_ms: config.backoff_base_ms,
                ..RetryConfig::default()
            },
            retry_statuses: config.retry_statuses.clone(),
            rate_limiter,
        })
    }

    /// Identity headers sent with every request
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Determine if a status code should trigger a retry
    pub fn should_retry(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// A single GET attempt
    async fn attempt(&self, url: &str) -> Result<Bytes, FetchError> {
        let response = self
            .client
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status().as_u16();
        if self.should_retry(status) {
            return Err(FetchError::ServerError(status));
        }

        if !response.status().is_success() {
            tracing::debug!(url = %url, status, "Returning non-success body as-is");
        }

        response.bytes().await.map_err(classify_reqwest_error)
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        tracing::debug!(url = %url, "Fetching URL");

        match with_retry_if(&self.retry, || self.attempt(url), FetchError::is_retryable).await {
            Ok(body) => Ok(body),
            Err(exhausted) if exhausted.last_error.is_retryable() => {
                Err(FetchError::MaxRetriesExceeded {
                    attempts: exhausted.attempts,
                    last: exhausted.last_error.to_string(),
                })
            }
            Err(exhausted) => Err(exhausted.last_error),
        }
    }
}

fn classify_reqwest_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Http(e)
    }
}

/// Decode page bytes to a string
///
/// Tries, in order:
/// 1. A byte order mark
/// 2. A `charset=` declaration in the first 1024 bytes
/// 3. UTF-8, replacing malformed sequences
pub fn decode_page(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text.into_owned();
    }

    let head = &bytes[..bytes.len().min(1024)];
    let encoding = sniff_charset(head).unwrap_or(UTF_8);
    let (text, _encoding, _had_errors) = encoding.decode(bytes);
    text.into_owned()
}

/// Find a `charset=` label in the document head
fn sniff_charset(head: &[u8]) -> Option<&'static Encoding> {
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();
    let start = head.find("charset=")? + "charset=".len();
    let label: String = head[start..]
        .trim_start_matches(|c| c == '"' || c == '\'')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    Encoding::for_label(label.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_retry() {
        let fetcher = HttpFetcher::new().unwrap();

        assert!(fetcher.should_retry(500));
        assert!(fetcher.should_retry(502));
        assert!(fetcher.should_retry(504));

        assert!(!fetcher.should_retry(503));
        assert!(!fetcher.should_retry(429));
        assert!(!fetcher.should_retry(404));
        assert!(!fetcher.should_retry(200));
    }

    #[test]
    fn test_fixed_user_agent() {
        let fetcher = HttpFetcher::new().unwrap();
        assert_eq!(
            fetcher.headers().get(USER_AGENT).unwrap().to_str().unwrap(),
            "Mozilla/5.0"
        );
        assert_eq!(fetcher.headers().len(), 1);
    }

    #[test]
    fn test_fetcher_with_rate_limit() {
        let config = FetcherConfig {
            requests_per_second: 2,
            ..Default::default()
        };
        let fetcher = HttpFetcher::with_config(&config).unwrap();
        assert!(fetcher.rate_limiter.is_some());
        assert!(HttpFetcher::new().unwrap().rate_limiter.is_none());
    }

    #[tokio::test]
    async fn test_invalid_url_is_not_requested() {
        let fetcher = HttpFetcher::new().unwrap();
        let result = fetcher.fetch("/zh/hongkong/review/x").await;
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn test_decode_utf8() {
        let text = "<html><body>好味道 Great food</body></html>";
        assert_eq!(decode_page(text.as_bytes()), text);
    }

    #[test]
    fn test_decode_utf8_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("食評".as_bytes());
        assert_eq!(decode_page(&bytes), "食評");
    }

    #[test]
    fn test_decode_meta_charset_big5() {
        let mut bytes = br#"<html><head><meta charset="big5"></head><body>"#.to_vec();
        // "好" in Big5
        bytes.extend_from_slice(&[0xA6, 0x6E]);
        bytes.extend_from_slice(b"</body></html>");

        let decoded = decode_page(&bytes);
        assert!(decoded.contains('好'));
    }

    #[test]
    fn test_decode_invalid_utf8_is_lossy() {
        let decoded = decode_page(&[b'o', b'k', 0xFF]);
        assert!(decoded.starts_with("ok"));
    }
}
