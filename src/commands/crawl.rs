use anyhow::{Context, Result};

use review_crawler::config::Config;
use review_crawler::crawler::{CrawlController, HttpFetcher};
use review_crawler::utils::truncate_text;

/// Discover review links starting from `start_url` (or the configured root)
///
/// The review link file is written at every checkpoint and once more when the
/// walk ends, whether it completed or was interrupted with Ctrl-C.
pub async fn crawl(config: Config, start_url: Option<String>) -> Result<()> {
    let start_url = start_url.unwrap_or_else(|| config.site.start_url.clone());

    println!("Starting Review Link Discovery");
    println!("==============================");
    println!("Start URL: {}", truncate_text(&start_url, 80));
    println!("Language: {}", config.site.language);
    println!("Max depth: {}", config.crawler.max_depth);
    println!(
        "Review links file: {}",
        config.crawler.review_links_path.display()
    );

    let fetcher =
        HttpFetcher::with_config(&config.fetcher).context("Failed to create fetcher")?;
    let mut controller = CrawlController::new(fetcher, &config);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to wait for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let interrupted = tokio::select! {
        result = controller.crawl(&start_url, 0) => {
            result.context("Failed to write review links checkpoint")?;
            false
        }
        _ = shutdown => {
            tracing::warn!("Interrupted, saving collected review links");
            true
        }
    };

    controller
        .flush()
        .context("Failed to write review links")?;

    let stats = controller.stats();
    tracing::info!(
        pages = stats.pages_crawled,
        fetch_failures = stats.fetch_failures,
        depth_skipped = stats.depth_skipped,
        reviews = stats.reviews_collected,
        interrupted,
        "Crawl finished"
    );

    println!("\nCrawl Summary");
    println!("-------------");
    if interrupted {
        println!("Status: interrupted");
    }
    println!("Pages crawled: {}", stats.pages_crawled);
    println!("Fetch failures: {}", stats.fetch_failures);
    println!("Depth-skipped links: {}", stats.depth_skipped);
    println!("Review links: {}", stats.reviews_collected);
    println!(
        "Saved to: {}",
        controller.link_file().path().display()
    );

    Ok(())
}
