//! Web crawling functionality
//!
//! This module implements link discovery over the review site and batch
//! scraping of the review pages it finds:
//!
//! - [`fetcher`]: HTTP fetching with retry and optional rate limiting
//! - [`url`] / [`links`] / [`classify`]: finding and sorting internal links
//! - [`controller`]: depth-bounded link discovery with checkpoints
//! - [`pipeline`]: worker pool that scrapes review pages

pub mod classify;
pub mod controller;
pub mod fetcher;
pub mod links;
pub mod pipeline;
pub mod url;

pub use classify::{Classified, LinkClassifier};
pub use controller::CrawlController;
pub use fetcher::{decode_page, Fetch, HttpFetcher};
pub use links::LinkExtractor;
pub use pipeline::{scrape_page, BatchScraper, StatsSnapshot};
