//! Internal link extraction
//!
//! Pulls every anchor out of a page and keeps the ones that point back into
//! the review site: site-relative paths (made absolute against the canonical
//! origin) and links whose registered domain label is the site's domain name.
//! Scheme-less links take the origin's scheme.
//! Output keeps document order and may contain duplicates.

use scraper::Html;
use url::Url;

use crate::config::SiteConfig;
use crate::crawler::url::{absolutize, Link};
use crate::parser::selectors::LinkSelectors;

/// Extracts internal links from review site pages
pub struct LinkExtractor {
    selectors: LinkSelectors,
    origin: String,
    scheme: String,
    domain_name: String,
}

impl LinkExtractor {
    /// Create an extractor for the given site
    #[must_use]
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            selectors: LinkSelectors::new(),
            origin: site.origin.clone(),
            scheme: Url::parse(&site.origin)
                .map(|url| url.scheme().to_string())
                .unwrap_or_else(|_| "https".to_string()),
            domain_name: site.domain_name.to_lowercase(),
        }
    }

    /// Extract candidate internal links from decoded page HTML
    ///
    /// Anchors are searched inside `<body>` when there is one, otherwise in
    /// the whole document.
    ///
    /// # Examples
    ///
    /// ```
    /// use review_crawler::config::SiteConfig;
    /// use review_crawler::crawler::links::LinkExtractor;
    ///
    /// let extractor = LinkExtractor::new(&SiteConfig::default());
    /// let html = r#"<body><a href="/en/restaurant/r-123">R</a><a href="https://example.com/page">X</a></body>"#;
    /// assert_eq!(
    ///     extractor.extract(html),
    ///     vec!["https://www.openrice.com/en/restaurant/r-123"]
    /// );
    /// ```
    pub fn extract(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);

        let hrefs: Vec<&str> = match document.select(self.selectors.body).next() {
            Some(body) => body
                .select(self.selectors.anchor)
                .filter_map(|a| a.value().attr("href"))
                .collect(),
            None => document
                .select(self.selectors.anchor)
                .filter_map(|a| a.value().attr("href"))
                .collect(),
        };

        let links: Vec<String> = hrefs
            .into_iter()
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .filter_map(|href| self.internalize(href))
            .collect();

        tracing::trace!(count = links.len(), "Extracted internal links");
        links
    }

    /// Absolute form of an internal link, `None` for anything external
    fn internalize(&self, href: &str) -> Option<String> {
        if href.starts_with('/') {
            return Some(absolutize(&self.origin, href));
        }

        let link = Link::parse(href)?;
        if link.domain_label()? != self.domain_name {
            return None;
        }
        if !link.is_scheme_less() {
            return Some(href.to_string());
        }

        let mut url = link.as_url().clone();
        if url.set_scheme(&self.scheme).is_err() {
            tracing::debug!(href, scheme = %self.scheme, "Keeping http for scheme-less link");
        }
        Some(url.to_string())
    }
}
