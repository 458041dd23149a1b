use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use review_crawler::config::Config;
use review_crawler::crawler::{BatchScraper, HttpFetcher};
use review_crawler::storage::{read_url_list, save_records};

/// Scrape every review page listed in `input` into the configured CSV table
pub async fn scrape(config: Config, input: &Path) -> Result<()> {
    let urls = read_url_list(input)?;
    let output = &config.scraper.output_path;

    println!("Starting Review Scrape");
    println!("======================");
    println!("Input: {} ({} URLs)", input.display(), urls.len());
    println!("Workers: {}", config.scraper.workers);
    println!("Output: {}", output.display());

    let fetcher =
        HttpFetcher::with_config(&config.fetcher).context("Failed to create fetcher")?;
    let scraper = BatchScraper::new(Arc::new(fetcher), config.scraper.workers);

    let records = scraper.run(urls).await;

    save_records(output, &records)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let stats = scraper.stats();
    let without_ratings = records.iter().filter(|r| !r.ratings.is_complete()).count();
    let net_sentiment: i64 = records
        .iter()
        .filter_map(|r| r.sentiment)
        .map(|s| i64::from(s.score()))
        .sum();

    println!("\nScrape Summary");
    println!("--------------");
    println!("Rows written: {}", records.len());
    println!("Fetch failures: {}", stats.failed_count);
    println!("Rows without ratings: {without_ratings}");
    println!("Net sentiment: {net_sentiment:+}");
    println!("Success rate: {:.1}%", stats.success_rate() * 100.0);

    Ok(())
}
