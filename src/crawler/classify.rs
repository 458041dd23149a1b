//! Link classification into restaurant pages and review pages

use std::collections::{BTreeSet, HashSet};

use crate::config::SiteConfig;
use crate::crawler::url::Link;

/// Links sorted into the two kinds the crawler cares about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    /// Unvisited restaurant listing/detail pages to descend into
    pub restaurant_links: Vec<String>,

    /// Review pages not collected yet
    pub review_links: Vec<String>,
}

/// Classifies absolute internal links by path fingerprint
pub struct LinkClassifier {
    language: String,
    review_fingerprint: String,
    restaurant_fingerprints: Vec<String>,
}

impl LinkClassifier {
    /// Create a classifier for the site's language and fingerprints
    #[must_use]
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            language: site.language.clone(),
            review_fingerprint: site.review_fingerprint.clone(),
            restaurant_fingerprints: site.restaurant_fingerprints.clone(),
        }
    }

    /// Whether a link belongs to the crawled part of the site: subdomain
    /// `www` and a `/<language>/` path segment
    pub fn in_scope(&self, link: &str) -> bool {
        Link::parse(link)
            .is_some_and(|l| l.subdomain() == Some("www") && l.has_language(&self.language))
    }

    /// Split links into new restaurant links and new review links
    ///
    /// Both lists are deduplicated and keep first-seen order. Restaurant
    /// links are grouped by fingerprint, in fingerprint order. A link with
    /// the review fingerprint is never a restaurant link.
    pub fn classify(
        &self,
        links: &[String],
        visited: &HashSet<String>,
        reviews: &BTreeSet<String>,
    ) -> Classified {
        let in_scope: Vec<&String> = links.iter().filter(|l| self.in_scope(l)).collect();
        let mut classified = Classified::default();

        let mut seen = HashSet::new();
        for link in &in_scope {
            if link.contains(&self.review_fingerprint)
                && !reviews.contains(link.as_str())
                && seen.insert(link.as_str())
            {
                classified.review_links.push((*link).clone());
            }
        }

        let mut seen = HashSet::new();
        for fingerprint in &self.restaurant_fingerprints {
            for link in &in_scope {
                if link.contains(fingerprint.as_str())
                    && !link.contains(&self.review_fingerprint)
                    && !visited.contains(link.as_str())
                    && seen.insert(link.as_str())
                {
                    classified.restaurant_links.push((*link).clone());
                }
            }
        }

        classified
    }
}
