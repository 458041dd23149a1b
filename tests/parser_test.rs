//! Review parser tests using HTML fixture files

mod common;

use std::fs;

use common::review_page;
use review_crawler::models::{Ratings, ScrapedRecord, Sentiment};
use review_crawler::parser::ReviewParser;

/// Test fixture paths
const FIXTURES_DIR: &str = "tests/fixtures/html";

const URL: &str = "https://www.openrice.com/zh/hongkong/review/great-food-e1";

fn load_fixture(filename: &str) -> String {
    let path = format!("{FIXTURES_DIR}/{filename}");
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to load fixture: {path}"))
}

// ============================================================================
// Fixture Pages
// ============================================================================

#[test]
fn test_parse_full_review_page() {
    let html = load_fixture("review_page.html");
    let record = ReviewParser::new().parse(&html, URL);

    assert_eq!(
        record,
        ScrapedRecord {
            url: URL.to_string(),
            title: Some("Great food".to_string()),
            review: Some("Loved it".to_string()),
            sentiment: Some(Sentiment::Positive),
            ratings: Ratings {
                taste: Some(4),
                environment: Some(5),
                service: Some(3),
                hygiene: Some(5),
                value: Some(4),
            },
        }
    );
}

#[test]
fn test_parse_page_with_four_subjects() {
    let html = load_fixture("review_page_no_rating.html");
    let record = ReviewParser::new().parse(&html, URL);

    assert_eq!(record.title.as_deref(), Some("排隊太耐"));
    assert_eq!(record.sentiment, Some(Sentiment::Negative));
    assert_eq!(record.ratings, Ratings::absent());

    let review = record.review.unwrap();
    assert!(review.starts_with("等咗一個鐘。"));
    assert!(review.ends_with("食物普通。"));
}

// ============================================================================
// Generated Pages
// ============================================================================

#[test]
fn test_six_subjects_all_absent() {
    let html = review_page("t", "r", "smiley_ok", &[1, 2, 3, 4, 5, 1]);
    let record = ReviewParser::new().parse(&html, URL);

    assert_eq!(record.ratings, Ratings::absent());
    assert_eq!(record.sentiment, Some(Sentiment::Neutral));
}

#[test]
fn test_smile_and_ok_is_positive() {
    let html = r#"<html><body><div class="left-header">
        <div class="smiley_ok"></div><div class="smiley_smile"></div>
    </div></body></html>"#;

    let record = ReviewParser::new().parse(html, URL);
    assert_eq!(record.sentiment, Some(Sentiment::Positive));
}

#[test]
fn test_no_rating_section() {
    let html = r#"<html><body><div class="review-title">Only a title</div></body></html>"#;
    let record = ReviewParser::new().parse(html, URL);

    assert_eq!(record.title.as_deref(), Some("Only a title"));
    assert!(record.review.is_none());
    assert!(record.sentiment.is_none());
    assert_eq!(record.ratings, Ratings::absent());
}

#[test]
fn test_unrelated_page_is_empty_record() {
    let html = "<html><body><h1>404</h1></body></html>";
    let record = ReviewParser::new().parse(html, URL);

    assert!(record.is_empty());
    assert_eq!(record.url, URL);
}

#[test]
fn test_only_first_rating_section_counts() {
    let first = review_page("t", "r", "smiley_smile", &[1, 1, 1, 1, 1]);
    let html = first.replace(
        "</body>",
        r#"<section itemprop="reviewrating"><div class="subject"></div></section></body>"#,
    );

    let record = ReviewParser::new().parse(&html, URL);
    assert_eq!(record.ratings, Ratings::from_counts(&[1, 1, 1, 1, 1]));
}
