//! File persistence for crawl and scrape output
//!
//! - [`checkpoint`]: the newline-delimited review link file
//! - [`table`]: the CSV table of scraped review records

pub mod checkpoint;
pub mod table;

pub use checkpoint::{read_url_list, ReviewLinkFile};
pub use table::{save_records, write_records, ReviewRow};
