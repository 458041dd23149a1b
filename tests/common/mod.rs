//! Common test utilities

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use review_crawler::config::Config;
use review_crawler::crawler::Fetch;
use review_crawler::utils::error::FetchError;

/// Canonical site origin used throughout the tests
pub const ORIGIN: &str = "https://www.openrice.com";

/// Default crawl root
pub const ROOT: &str = "https://www.openrice.com/zh/hongkong/restaurants";

/// In-memory fetcher serving fixed pages
///
/// Unknown URLs fail with a server error. Every call is logged, so tests can
/// assert how often and in which order pages were requested.
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    log: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` at `url`
    pub fn with_page(mut self, url: &str, body: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), body.into());
        self
    }

    /// Serve a page whose body holds one anchor per href
    pub fn with_links(self, url: &str, hrefs: &[&str]) -> Self {
        let body = link_page(hrefs);
        self.with_page(url, body)
    }

    /// Delay the response for `url`
    #[allow(dead_code)]
    pub fn with_delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    /// Every URL requested so far, in request order
    pub fn requests(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// Number of requests made for `url`
    #[allow(dead_code)]
    pub fn count(&self, url: &str) -> usize {
        self.log.lock().unwrap().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl Fetch for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        self.log.lock().unwrap().push(url.to_string());

        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }

        self.pages
            .get(url)
            .map(|body| Bytes::from(body.clone()))
            .ok_or(FetchError::MaxRetriesExceeded {
                attempts: 4,
                last: "Server error: 500".to_string(),
            })
    }
}

/// HTML page containing one anchor per href
pub fn link_page(hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{href}">link</a>"#))
        .collect();
    format!("<!DOCTYPE html><html><head><title>t</title></head><body>{anchors}</body></html>")
}

/// Absolute URL on the canonical origin
pub fn site_url(path: &str) -> String {
    format!("{ORIGIN}{path}")
}

/// Default configuration writing its review links into `dir`
pub fn test_config(dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.crawler.review_links_path = dir.join("review_links.txt");
    config.scraper.output_path = dir.join("reviews.csv");
    config
}

/// Review page markup with the given parts
#[allow(dead_code)]
pub fn review_page(title: &str, review: &str, smiley: &str, stars: &[usize]) -> String {
    let subjects: String = stars
        .iter()
        .map(|n| {
            format!(
                r#"<div class="subject"><span>s</span>{}</div>"#,
                r#"<span class="or-sprite-inline-block common_yellowstar_desktop"></span>"#
                    .repeat(*n)
            )
        })
        .collect();

    format!(
        r#"<html><body>
        <div class="left-header"><div class="{smiley}"></div></div>
        <div class="review-title">{title}</div>
        <section itemprop="reviewrating">{subjects}</section>
        <section class="review-container">{review}</section>
        </body></html>"#
    )
}
