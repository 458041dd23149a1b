//! review-crawler - Restaurant review site crawler
//!
//! Discovers review pages on a restaurant review site by a depth-bounded walk
//! over its restaurant pages, then scrapes each review page into a table row.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`crawler`] - Fetching, link discovery and batch scraping
//! - [`parser`] - HTML parsing and review extraction
//! - [`models`] - Core data structures and types
//! - [`storage`] - Review link file and CSV output
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use review_crawler::config::Config;
//! use review_crawler::crawler::{CrawlController, HttpFetcher};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let fetcher = HttpFetcher::with_config(&config.fetcher)?;
//!     let mut controller = CrawlController::new(fetcher, &config);
//!     controller.crawl(&config.site.start_url, 0).await?;
//!     controller.flush()?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crawler;
pub mod error;
pub mod models;
pub mod parser;
pub mod storage;
pub mod utils;

// Direct re-exports for convenience
pub use models::{CrawlStats, Ratings, ScrapedRecord, Sentiment};
