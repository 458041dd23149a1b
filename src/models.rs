// Core data structures for the review crawler

use serde::{Deserialize, Serialize};

/// Overall impression icon shown on a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Numeric score: positive = 1, neutral = 0, negative = -1
    pub fn score(&self) -> i8 {
        match self {
            Self::Positive => 1,
            Self::Neutral => 0,
            Self::Negative => -1,
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The five sub-ratings of a review, all present or all absent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratings {
    pub taste: Option<u8>,
    pub environment: Option<u8>,
    pub service: Option<u8>,
    pub hygiene: Option<u8>,
    pub value: Option<u8>,
}

impl Ratings {
    /// Number of rating subjects a review page must carry
    pub const SUBJECTS: usize = 5;

    /// Ratings with every slot absent
    pub fn absent() -> Self {
        Self::default()
    }

    /// Build ratings from exactly five star counts, in page order
    ///
    /// Any other number of counts yields fully absent ratings.
    pub fn from_counts(counts: &[u8]) -> Self {
        match counts {
            [taste, environment, service, hygiene, value] => Self {
                taste: Some(*taste),
                environment: Some(*environment),
                service: Some(*service),
                hygiene: Some(*hygiene),
                value: Some(*value),
            },
            _ => Self::absent(),
        }
    }

    /// Whether every rating slot is filled
    pub fn is_complete(&self) -> bool {
        self.as_array().iter().all(Option::is_some)
    }

    /// Ratings in page order (taste, environment, service, hygiene, value)
    pub fn as_array(&self) -> [Option<u8>; 5] {
        [
            self.taste,
            self.environment,
            self.service,
            self.hygiene,
            self.value,
        ]
    }
}

/// Structured data extracted from one review page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedRecord {
    pub url: String,
    pub title: Option<String>,
    pub review: Option<String>,
    pub sentiment: Option<Sentiment>,
    pub ratings: Ratings,
}

impl ScrapedRecord {
    /// Record for a page that could not be fetched: every field absent
    pub fn empty(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Default::default()
        }
    }

    /// Whether nothing at all was extracted
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.review.is_none()
            && self.sentiment.is_none()
            && !self.ratings.is_complete()
    }
}

/// Crawl progress counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    /// Pages fetched and added to the visited set
    pub pages_crawled: usize,

    /// Fetches that failed after retries
    pub fetch_failures: usize,

    /// Frames dropped by the depth bound
    pub depth_skipped: usize,

    /// Review links collected so far
    pub reviews_collected: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_score() {
        assert_eq!(Sentiment::Positive.score(), 1);
        assert_eq!(Sentiment::Neutral.score(), 0);
        assert_eq!(Sentiment::Negative.score(), -1);
    }

    #[test]
    fn test_sentiment_display() {
        assert_eq!(Sentiment::Neutral.to_string(), "neutral");
    }

    #[test]
    fn test_ratings_from_five_counts() {
        let ratings = Ratings::from_counts(&[4, 5, 3, 5, 4]);
        assert!(ratings.is_complete());
        assert_eq!(ratings.taste, Some(4));
        assert_eq!(ratings.value, Some(4));
    }

    #[test]
    fn test_ratings_wrong_count_is_absent() {
        assert_eq!(Ratings::from_counts(&[1, 2, 3, 4]), Ratings::absent());
        assert_eq!(Ratings::from_counts(&[1, 2, 3, 4, 5, 0]), Ratings::absent());
        assert_eq!(Ratings::from_counts(&[]), Ratings::absent());
    }

    #[test]
    fn test_empty_record() {
        let record = ScrapedRecord::empty("https://www.openrice.com/zh/hongkong/review/x");
        assert!(record.is_empty());
        assert_eq!(record.ratings, Ratings::absent());
    }
}
