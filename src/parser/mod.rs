//! HTML parsing and data extraction
//!
//! This module handles parsing review site pages and extracting structured
//! review data.

pub mod html;
pub mod selectors;

// Re-export main parser
pub use html::ReviewParser;
