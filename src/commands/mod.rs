pub mod crawl;
pub mod scrape;

// Re-export command functions for convenience
pub use crawl::crawl;
pub use scrape::scrape;
