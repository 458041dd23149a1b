//! Configuration management for the review crawler
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files. Every section has defaults matching the target
//! review site, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Target site description
    pub site: SiteConfig,

    /// Link discovery configuration
    pub crawler: CrawlerConfig,

    /// HTTP fetcher configuration
    pub fetcher: FetcherConfig,

    /// Batch scraping configuration
    pub scraper: ScraperConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// The single review site being crawled
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Canonical origin prefixed to site-relative links
    pub origin: String,

    /// Registered domain label, without public suffix (e.g. `openrice`)
    pub domain_name: String,

    /// Language path segment links must carry (e.g. `zh` for `/zh/`)
    pub language: String,

    /// Path fingerprint identifying review pages
    pub review_fingerprint: String,

    /// Ordered path fingerprints identifying restaurant listing/detail pages
    pub restaurant_fingerprints: Vec<String>,

    /// Default crawl root
    pub start_url: String,
}

/// Link discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum recursion depth below the start URL
    pub max_depth: usize,

    /// Flush the review links every time this many pages have been visited
    pub checkpoint_interval: usize,

    /// Newline-delimited review link file
    pub review_links_path: PathBuf,
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// User agent string sent with every request
    pub user_agent: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Retries after the first attempt
    pub max_retries: u32,

    /// Backoff base delay in milliseconds
    pub backoff_base_ms: u64,

    /// Status codes that trigger a retry
    pub retry_statuses: Vec<u16>,

    /// Requests per second, 0 disables rate limiting
    pub requests_per_second: u32,
}

/// Batch scraping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Number of concurrent scraping workers
    pub workers: usize,

    /// CSV output path
    pub output_path: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: String::from("https://www.openrice.com"),
            domain_name: String::from("openrice"),
            language: String::from("zh"),
            review_fingerprint: String::from("review/"),
            restaurant_fingerprints: vec![String::from("/restaurants"), String::from("/r-")],
            start_url: String::from("https://www.openrice.com/zh/hongkong/restaurants"),
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 25,
            checkpoint_interval: 1000,
            review_links_path: PathBuf::from("review_links.txt"),
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: String::from("Mozilla/5.0"),
            request_timeout_secs: 10,
            max_retries: 3,
            backoff_base_ms: 300,
            retry_statuses: vec![500, 502, 504],
            requests_per_second: 0,
        }
    }
}

impl FetcherConfig {
    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            workers: 5,
            output_path: PathBuf::from("reviews.csv"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

impl Config {
    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(origin) = std::env::var("REVIEW_CRAWLER_ORIGIN") {
            config.site.origin = origin;
        }
        if let Ok(domain) = std::env::var("REVIEW_CRAWLER_DOMAIN") {
            config.site.domain_name = domain;
        }
        if let Ok(language) = std::env::var("REVIEW_CRAWLER_LANGUAGE") {
            config.site.language = language;
        }
        if let Ok(start_url) = std::env::var("REVIEW_CRAWLER_START_URL") {
            config.site.start_url = start_url;
        }
        if let Some(depth) = env_parse("REVIEW_CRAWLER_MAX_DEPTH") {
            config.crawler.max_depth = depth;
        }
        if let Some(interval) = env_parse("REVIEW_CRAWLER_CHECKPOINT_INTERVAL") {
            config.crawler.checkpoint_interval = interval;
        }
        if let Ok(path) = std::env::var("REVIEW_CRAWLER_REVIEW_LINKS") {
            config.crawler.review_links_path = path.into();
        }
        if let Ok(user_agent) = std::env::var("REVIEW_CRAWLER_USER_AGENT") {
            config.fetcher.user_agent = user_agent;
        }
        if let Some(timeout) = env_parse("REVIEW_CRAWLER_REQUEST_TIMEOUT") {
            config.fetcher.request_timeout_secs = timeout;
        }
        if let Some(rps) = env_parse("REVIEW_CRAWLER_RATE_LIMIT") {
            config.fetcher.requests_per_second = rps;
        }
        if let Some(workers) = env_parse("REVIEW_CRAWLER_WORKERS") {
            config.scraper.workers = workers;
        }
        if let Ok(path) = std::env::var("REVIEW_CRAWLER_OUTPUT") {
            config.scraper.output_path = path.into();
        }
        if let Ok(level) = std::env::var("REVIEW_CRAWLER_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = std::env::var("REVIEW_CRAWLER_LOG_FORMAT") {
            config.logging.format = format;
        }

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        Self::from_toml(&content).map_err(|e| match e {
            Error::Config(msg) => Error::config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Invalid TOML: {e}")))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.site.domain_name.is_empty() {
            return Err(Error::config("site.domain_name must not be empty"));
        }

        if self.site.language.is_empty() {
            return Err(Error::config("site.language must not be empty"));
        }

        let origin = Url::parse(&self.site.origin)
            .map_err(|e| Error::config(format!("site.origin is not a valid URL: {e}")))?;
        if origin.host_str().is_none() {
            return Err(Error::config("site.origin has no host"));
        }

        if self.site.review_fingerprint.is_empty() {
            return Err(Error::config("site.review_fingerprint must not be empty"));
        }

        if self.crawler.checkpoint_interval == 0 {
            return Err(Error::config(
                "crawler.checkpoint_interval must be greater than 0",
            ));
        }

        if self.fetcher.request_timeout_secs == 0 {
            return Err(Error::config(
                "fetcher.request_timeout_secs must be greater than 0",
            ));
        }

        if self.scraper.workers == 0 {
            return Err(Error::config("scraper.workers must be greater than 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.crawler.max_depth, 25);
        assert_eq!(config.crawler.checkpoint_interval, 1000);
        assert_eq!(config.site.language, "zh");
    }

    #[test]
    fn test_invalid_workers() {
        let mut config = Config::default();
        config.scraper.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_origin() {
        let mut config = Config::default();
        config.site.origin = String::from("not a url");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_checkpoint_interval() {
        let mut config = Config::default();
        config.crawler.checkpoint_interval = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_request_timeout_conversion() {
        let config = Config::default();
        assert_eq!(config.fetcher.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [crawler]
            max_depth = 3

            [site]
            language = "en"
            "#,
        )
        .unwrap();

        assert_eq!(config.crawler.max_depth, 3);
        assert_eq!(config.crawler.checkpoint_interval, 1000);
        assert_eq!(config.site.language, "en");
        assert_eq!(config.site.domain_name, "openrice");
        assert_eq!(config.fetcher.retry_statuses, vec![500, 502, 504]);
    }

    #[test]
    fn test_invalid_toml() {
        let result = Config::from_toml("[crawler\nmax_depth = ");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
