//! CSS selectors for review site pages
//!
//! Class selectors use exact attribute matches (`[class="..."]`) so that an
//! element carrying extra classes does not match, the same way the site's
//! markup is addressed by whole class strings.

use lazy_static::lazy_static;
use scraper::Selector;

// Helper macro to parse selectors safely at compile time
macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

lazy_static! {
    // Link discovery
    static ref BODY: Selector = parse_selector!("body");
    static ref ANCHOR: Selector = parse_selector!("a[href]");

    // Review page content
    static ref REVIEW_TITLE: Selector = parse_selector!(r#"div[class="review-title"]"#);
    static ref REVIEW_BODY: Selector = parse_selector!(r#"section[class="review-container"]"#);

    // Sentiment icon, checked in this order
    static ref SENTIMENT_HEADER: Selector = parse_selector!(r#"div[class="left-header"]"#);
    static ref SMILEY_SMILE: Selector = parse_selector!(r#"div[class*="smiley_smile"]"#);
    static ref SMILEY_OK: Selector = parse_selector!(r#"div[class*="smiley_ok"]"#);
    static ref SMILEY_CRY: Selector = parse_selector!(r#"div[class*="smiley_cry"]"#);

    // Sub-ratings
    static ref RATING_SECTION: Selector = parse_selector!(r#"section[itemprop="reviewrating"]"#);
    static ref RATING_SUBJECT: Selector = parse_selector!(r#"div[class="subject"]"#);
    static ref RATING_STAR: Selector =
        parse_selector!(r#"span[class="or-sprite-inline-block common_yellowstar_desktop"]"#);
}

/// Selectors used to discover links on any page
pub struct LinkSelectors {
    pub body: &'static Selector,
    pub anchor: &'static Selector,
}

impl LinkSelectors {
    pub fn new() -> Self {
        Self {
            body: &BODY,
            anchor: &ANCHOR,
        }
    }
}

impl Default for LinkSelectors {
    fn default() -> Self {
        Self::new()
    }
}

/// Selectors for the fields of a single review page
pub struct ReviewSelectors {
    pub title: &'static Selector,
    pub review: &'static Selector,
    pub sentiment_header: &'static Selector,
    /// Positive, neutral and negative markers, in priority order
    pub sentiment_markers: [&'static Selector; 3],
    pub rating_section: &'static Selector,
    pub rating_subject: &'static Selector,
    pub rating_star: &'static Selector,
}

impl ReviewSelectors {
    pub fn new() -> Self {
        Self {
            title: &REVIEW_TITLE,
            review: &REVIEW_BODY,
            sentiment_header: &SENTIMENT_HEADER,
            sentiment_markers: [&*SMILEY_SMILE, &*SMILEY_OK, &*SMILEY_CRY],
            rating_section: &RATING_SECTION,
            rating_subject: &RATING_SUBJECT,
            rating_star: &RATING_STAR,
        }
    }
}

impl Default for ReviewSelectors {
    fn default() -> Self {
        Self::new()
    }
}
