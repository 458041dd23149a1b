use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use review_crawler::config::Config;

mod commands;

#[derive(Parser)]
#[command(
    name = "review-crawler",
    version,
    about = "Restaurant review site crawler: discovers review pages and scrapes them into CSV",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file (defaults and REVIEW_CRAWLER_* variables otherwise)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover review links by walking restaurant pages
    Crawl {
        /// Root URL to start from
        #[arg(short, long)]
        url: Option<String>,

        /// Maximum recursion depth
        #[arg(short = 'd', long)]
        max_depth: Option<usize>,

        /// Language path segment to stay within (e.g. zh, en)
        #[arg(short, long)]
        language: Option<String>,

        /// Review links output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Scrape review pages listed in a file into a CSV table
    Scrape {
        /// Newline-delimited review link file
        #[arg(short, long)]
        input: PathBuf,

        /// CSV output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of concurrent workers
        #[arg(short, long)]
        workers: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    let log_format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());
    setup_tracing(&log_format, &config.logging.level, cli.verbose)?;

    tracing::info!("review-crawler starting");

    match cli.command {
        Commands::Crawl {
            url,
            max_depth,
            language,
            output,
        } => {
            if let Some(max_depth) = max_depth {
                config.crawler.max_depth = max_depth;
            }
            if let Some(language) = language {
                config.site.language = language;
            }
            if let Some(output) = output {
                config.crawler.review_links_path = output;
            }
            config.validate().context("Invalid configuration")?;

            tracing::info!(
                url = ?url,
                max_depth = config.crawler.max_depth,
                language = %config.site.language,
                "Starting crawl command"
            );
            commands::crawl(config, url).await?;
        }

        Commands::Scrape {
            input,
            output,
            workers,
        } => {
            if let Some(output) = output {
                config.scraper.output_path = output;
            }
            if let Some(workers) = workers {
                config.scraper.workers = workers;
            }
            config.validate().context("Invalid configuration")?;

            tracing::info!(
                input = %input.display(),
                workers = config.scraper.workers,
                "Starting scrape command"
            );
            commands::scrape(config, &input).await?;
        }
    }

    tracing::info!("review-crawler completed successfully");
    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("review_crawler=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .or_else(|_| tracing_subscriber::EnvFilter::try_new(format!("review_crawler={level},warn")))
            .context("Invalid log level")?
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
