//! Depth-bounded link discovery
//!
//! [`CrawlController`] walks restaurant pages depth-first from a root URL,
//! collecting review links along the way. All crawl state lives in the
//! controller: the set of visited pages, the set of collected review links and
//! progress counters. Pages are fetched one at a time.

use std::collections::{BTreeSet, HashSet};

use crate::config::Config;
use crate::crawler::classify::LinkClassifier;
use crate::crawler::fetcher::{decode_page, Fetch};
use crate::crawler::links::LinkExtractor;
use crate::error::Result;
use crate::models::CrawlStats;
use crate::storage::ReviewLinkFile;

/// Owns the state of one link discovery run
pub struct CrawlController<F> {
    fetcher: F,
    extractor: LinkExtractor,
    classifier: LinkClassifier,
    max_depth: usize,
    checkpoint_interval: usize,
    link_file: ReviewLinkFile,
    visited: HashSet<String>,
    reviews: BTreeSet<String>,
    stats: CrawlStats,
}

impl<F: Fetch> CrawlController<F> {
    /// Create a controller with empty state
    pub fn new(fetcher: F, config: &Config) -> Self {
        Self {
            fetcher,
            extractor: LinkExtractor::new(&config.site),
            classifier: LinkClassifier::new(&config.site),
            max_depth: config.crawler.max_depth,
            checkpoint_interval: config.crawler.checkpoint_interval.max(1),
            link_file: ReviewLinkFile::new(&config.crawler.review_links_path),
            visited: HashSet::new(),
            reviews: BTreeSet::new(),
            stats: CrawlStats::default(),
        }
    }

    /// Crawl from `url` at `depth`, descending into restaurant links
    ///
    /// Pages deeper than the depth bound and pages already visited are
    /// skipped without fetching. A page whose fetch fails is logged and left
    /// unvisited, so it can be tried again later. Traversal order matches a
    /// recursive depth-first walk with children in document order.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if a checkpoint cannot be written. Fetch failures
    /// never abort the traversal.
    pub async fn crawl(&mut self, url: &str, depth: usize) -> Result<()> {
        let mut stack = vec![(url.to_string(), depth)];

        while let Some((url, depth)) = stack.pop() {
            if depth > self.max_depth {
                self.stats.depth_skipped += 1;
                tracing::trace!(url = %url, depth, "Depth bound reached");
                continue;
            }
            if self.visited.contains(&url) {
                continue;
            }

            tracing::debug!(url = %url, depth, "Crawling page");

            let body = match self.fetcher.fetch(&url).await {
                Ok(body) => body,
                Err(e) => {
                    self.stats.fetch_failures += 1;
                    tracing::warn!(url = %url, depth, error = %e, "Failed to fetch page");
                    continue;
                }
            };

            let links = self.extractor.extract(&decode_page(&body));
            let classified = self.classifier.classify(&links, &self.visited, &self.reviews);

            self.reviews.extend(classified.review_links);
            self.visited.insert(url);
            self.stats.pages_crawled += 1;

            if self.visited.len() % self.checkpoint_interval == 0 {
                self.checkpoint()?;
            }

            stack.extend(
                classified
                    .restaurant_links
                    .into_iter()
                    .rev()
                    .map(|link| (link, depth + 1)),
            );
        }

        Ok(())
    }

    /// Write the review links and log a progress summary
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the review link file cannot be written
    pub fn checkpoint(&self) -> Result<()> {
        self.flush()?;
        tracing::info!(
            pages = self.visited.len(),
            reviews = self.reviews.len(),
            path = %self.link_file.path().display(),
            "Checkpoint saved"
        );
        Ok(())
    }

    /// Overwrite the review link file with the current review set
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the review link file cannot be written
    pub fn flush(&self) -> Result<()> {
        self.link_file.save(&self.reviews)
    }

    /// Pages crawled successfully
    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    /// Review links collected so far, sorted
    pub fn reviews(&self) -> &BTreeSet<String> {
        &self.reviews
    }

    /// Progress counters
    pub fn stats(&self) -> CrawlStats {
        CrawlStats {
            reviews_collected: self.reviews.len(),
            ..self.stats
        }
    }

    /// Review link file
    pub fn link_file(&self) -> &ReviewLinkFile {
        &self.link_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::FetchError;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    const ROOT: &str = "https://www.openrice.com/zh/hongkong/restaurants";

    /// Serves fixed pages and records every fetch
    #[derive(Default)]
    struct MapFetcher {
        pages: HashMap<String, String>,
        log: Mutex<Vec<String>>,
    }

    impl MapFetcher {
        fn page(mut self, url: &str, hrefs: &[&str]) -> Self {
            let anchors: String = hrefs
                .iter()
                .map(|h| format!(r#"<a href="{h}">x</a>"#))
                .collect();
            self.pages
                .insert(url.to_string(), format!("<html><body>{anchors}</body></html>"));
            self
        }

        fn fetched(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetch for MapFetcher {
        async fn fetch(&self, url: &str) -> std::result::Result<Bytes, FetchError> {
            self.log.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .map(|body| Bytes::from(body.clone()))
                .ok_or_else(|| FetchError::ServerError(500))
        }
    }

    fn config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.crawler.review_links_path = dir.path().join("review_links.txt");
        config
    }

    #[tokio::test]
    async fn test_depth_first_document_order() {
        let dir = TempDir::new().unwrap();
        let fetcher = MapFetcher::default()
            .page(ROOT, &["/zh/hongkong/r-a", "/zh/hongkong/r-b"])
            .page("https://www.openrice.com/zh/hongkong/r-a", &["/zh/hongkong/r-c"])
            .page("https://www.openrice.com/zh/hongkong/r-b", &[])
            .page("https://www.openrice.com/zh/hongkong/r-c", &[]);

        let mut controller = CrawlController::new(fetcher, &config(&dir));
        controller.crawl(ROOT, 0).await.unwrap();

        assert_eq!(
            controller.fetcher.fetched(),
            vec![
                ROOT.to_string(),
                "https://www.openrice.com/zh/hongkong/r-a".to_string(),
                "https://www.openrice.com/zh/hongkong/r-c".to_string(),
                "https://www.openrice.com/zh/hongkong/r-b".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_cycle_visits_once() {
        let dir = TempDir::new().unwrap();
        let fetcher = MapFetcher::default()
            .page(ROOT, &["/zh/hongkong/r-a"])
            .page("https://www.openrice.com/zh/hongkong/r-a", &["/zh/hongkong/restaurants"]);

        let mut controller = CrawlController::new(fetcher, &config(&dir));
        controller.crawl(ROOT, 0).await.unwrap();

        assert_eq!(controller.fetcher.fetched().len(), 2);
        assert_eq!(controller.stats().pages_crawled, 2);
    }

    #[tokio::test]
    async fn test_beyond_depth_is_noop() {
        let dir = TempDir::new().unwrap();
        let fetcher = MapFetcher::default().page(ROOT, &[]);

        let mut controller = CrawlController::new(fetcher, &config(&dir));
        controller.crawl(ROOT, 26).await.unwrap();

        assert!(controller.fetcher.fetched().is_empty());
        assert!(controller.visited().is_empty());
        assert_eq!(controller.stats().depth_skipped, 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_not_visited() {
        let dir = TempDir::new().unwrap();
        let mut controller = CrawlController::new(MapFetcher::default(), &config(&dir));

        controller.crawl(ROOT, 0).await.unwrap();
        controller.crawl(ROOT, 0).await.unwrap();

        assert!(controller.visited().is_empty());
        assert_eq!(controller.fetcher.fetched().len(), 2);
        assert_eq!(controller.stats().fetch_failures, 2);
    }

    #[tokio::test]
    async fn test_flush_writes_sorted_reviews() {
        let dir = TempDir::new().unwrap();
        let fetcher = MapFetcher::default().page(
            ROOT,
            &["/zh/hongkong/review/b", "/zh/hongkong/review/a", "/en/hongkong/review/c"],
        );

        let mut controller = CrawlController::new(fetcher, &config(&dir));
        controller.crawl(ROOT, 0).await.unwrap();
        controller.flush().unwrap();

        assert_eq!(
            controller.link_file().load().unwrap(),
            vec![
                "https://www.openrice.com/zh/hongkong/review/a",
                "https://www.openrice.com/zh/hongkong/review/b",
            ]
        );
        assert_eq!(controller.stats().reviews_collected, 2);
    }
}
