//! Review page parser
//!
//! Extracts title, review text, sentiment icon and the five sub-ratings from
//! a single review page. Missing structure is never an error: the field is
//! simply absent in the resulting [`ScrapedRecord`].

use scraper::{ElementRef, Html};

use crate::models::{Ratings, ScrapedRecord, Sentiment};
use crate::parser::selectors::ReviewSelectors;

/// Review page HTML parser
pub struct ReviewParser {
    selectors: ReviewSelectors,
}

impl ReviewParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            selectors: ReviewSelectors::new(),
        }
    }

    /// Parse a decoded review page
    ///
    /// Title and review are the concatenated text of the first matching
    /// element with leading and trailing whitespace stripped; whitespace
    /// inside the text is kept as it appears on the page.
    ///
    /// # Examples
    ///
    /// ```
    /// use review_crawler::parser::ReviewParser;
    ///
    /// let html = r#"<div class="review-title"> Great food </div>"#;
    /// let record = ReviewParser::new().parse(html, "https://www.openrice.com/zh/hongkong/review/a");
    /// assert_eq!(record.title.as_deref(), Some("Great food"));
    /// assert!(record.sentiment.is_none());
    /// ```
    pub fn parse(&self, html: &str, url: &str) -> ScrapedRecord {
        let document = Html::parse_document(html);

        ScrapedRecord {
            url: url.to_string(),
            title: self.extract_title(&document),
            review: self.extract_review(&document),
            sentiment: self.extract_sentiment(&document),
            ratings: self.extract_ratings(&document),
        }
    }

    fn extract_title(&self, document: &Html) -> Option<String> {
        document.select(self.selectors.title).next().map(trimmed_text)
    }

    fn extract_review(&self, document: &Html) -> Option<String> {
        document.select(self.selectors.review).next().map(trimmed_text)
    }

    /// First marker found under the sentiment header, positive first
    fn extract_sentiment(&self, document: &Html) -> Option<Sentiment> {
        let header = document.select(self.selectors.sentiment_header).next()?;

        let sentiments = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];
        sentiments
            .into_iter()
            .zip(self.selectors.sentiment_markers)
            .find(|(_, marker)| header.select(marker).next().is_some())
            .map(|(sentiment, _)| sentiment)
    }

    /// Star counts per subject; all absent unless there are exactly five
    fn extract_ratings(&self, document: &Html) -> Ratings {
        let Some(section) = document.select(self.selectors.rating_section).next() else {
            return Ratings::absent();
        };

        let counts: Vec<u8> = section
            .select(self.selectors.rating_subject)
            .map(|subject| {
                let stars = subject.select(self.selectors.rating_star).count();
                u8::try_from(stars).unwrap_or(u8::MAX)
            })
            .collect();

        if counts.len() != Ratings::SUBJECTS {
            tracing::debug!(subjects = counts.len(), "Unexpected rating subject count");
        }

        Ratings::from_counts(&counts)
    }
}

impl Default for ReviewParser {
    fn default() -> Self {
        Self::new()
    }
}

fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
