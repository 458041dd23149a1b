//! CSV output for scraped review records

use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::models::{ScrapedRecord, Sentiment};

/// Column order of the review table
pub const HEADERS: [&str; 9] = [
    "url",
    "title",
    "review",
    "sentiment",
    "taste",
    "environment",
    "service",
    "hygiene",
    "value",
];

/// One flattened table row; absent values serialize as empty cells
#[derive(Debug, Serialize)]
pub struct ReviewRow<'a> {
    pub url: &'a str,
    pub title: Option<&'a str>,
    pub review: Option<&'a str>,
    pub sentiment: Option<Sentiment>,
    pub taste: Option<u8>,
    pub environment: Option<u8>,
    pub service: Option<u8>,
    pub hygiene: Option<u8>,
    pub value: Option<u8>,
}

impl<'a> From<&'a ScrapedRecord> for ReviewRow<'a> {
    fn from(record: &'a ScrapedRecord) -> Self {
        let ratings = &record.ratings;
        Self {
            url: &record.url,
            title: record.title.as_deref(),
            review: record.review.as_deref(),
            sentiment: record.sentiment,
            taste: ratings.taste,
            environment: ratings.environment,
            service: ratings.service,
            hygiene: ratings.hygiene,
            value: ratings.value,
        }
    }
}

/// Write records as CSV, header first, one row per record in order
///
/// # Errors
///
/// Returns `Error::Csv` if a row cannot be written
pub fn write_records<W: Write>(writer: W, records: &[ScrapedRecord]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(HEADERS)?;
    for record in records {
        wtr.serialize(ReviewRow::from(record))?;
    }
    wtr.flush()?;

    Ok(())
}

/// Write records to a CSV file, replacing any existing file
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be created and `Error::Csv` if a
/// row cannot be written
pub fn save_records(path: &Path, records: &[ScrapedRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    write_records(File::create(path)?, records)?;
    tracing::debug!(path = %path.display(), rows = records.len(), "Review table saved");
    Ok(())
}
