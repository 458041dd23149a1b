//! Worker pool for batch review scraping
//!
//! A fixed number of workers pull jobs from a shared queue, fetch and parse
//! each review page, and report back on a result channel. A collector task
//! places every result at its job's position, so the output holds exactly one
//! record per input URL in input order regardless of completion order.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │    URL      │     │   Scrape    │     │   Result    │
//! │  Producer   │────▶│   Workers   │────▶│  Collector  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!              mpsc channel        mpsc channel
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use review_crawler::crawler::{BatchScraper, HttpFetcher};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let scraper = BatchScraper::new(Arc::new(HttpFetcher::new()?), 5);
//!
//! let urls = vec!["https://www.openrice.com/zh/hongkong/review/a".to_string()];
//! let records = scraper.run(urls).await;
//!
//! println!("Scraped {} pages", records.len());
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::crawler::fetcher::{decode_page, Fetch};
use crate::models::ScrapedRecord;
use crate::parser::ReviewParser;
use crate::utils::error::FetchError;

/// Job sent to scrape workers
#[derive(Debug, Clone)]
pub struct ScrapeJob {
    /// Position of the URL in the input list
    pub job_id: usize,
    pub url: String,
}

/// Result of a scrape job
#[derive(Debug, Clone)]
pub enum JobResult {
    /// Page fetched and parsed
    Scraped { job_id: usize, record: ScrapedRecord },
    /// Page could not be fetched; the record is empty
    Failed {
        job_id: usize,
        record: ScrapedRecord,
        error: String,
    },
}

impl JobResult {
    fn into_parts(self) -> (usize, ScrapedRecord) {
        match self {
            Self::Scraped { job_id, record } | Self::Failed { job_id, record, .. } => {
                (job_id, record)
            }
        }
    }
}

/// Pipeline statistics (thread-safe)
#[derive(Debug, Default)]
pub struct PipelineStats {
    /// Total jobs submitted
    pub total_jobs: AtomicU64,

    /// Pages fetched and parsed
    pub success_count: AtomicU64,

    /// Pages that could not be fetched
    pub failed_count: AtomicU64,
}

impl PipelineStats {
    /// Create new stats counter
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Record successful job
    pub fn record_success(&self) {
        self.success_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Record failed job
    pub fn record_failure(&self) {
        self.failed_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of current stats
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_jobs: self.total_jobs.load(Ordering::Relaxed),
            success_count: self.success_count.load(Ordering::Relaxed),
            failed_count: self.failed_count.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of pipeline statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub total_jobs: u64,
    pub success_count: u64,
    pub failed_count: u64,
}

impl StatsSnapshot {
    /// Success rate (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        let total = self.success_count + self.failed_count;
        if total == 0 {
            return 1.0;
        }
        self.success_count as f64 / total as f64
    }
}

/// Fetch and parse one review page
///
/// # Errors
///
/// Returns the fetcher's error when the page cannot be fetched
pub async fn scrape_page<F: Fetch + ?Sized>(
    fetcher: &F,
    parser: &ReviewParser,
    url: &str,
) -> Result<ScrapedRecord, FetchError> {
    let body = fetcher.fetch(url).await?;
    Ok(parser.parse(&decode_page(&body), url))
}

/// Fixed-size pool of review scraping workers
pub struct BatchScraper<F> {
    fetcher: Arc<F>,
    parser: Arc<ReviewParser>,
    workers: usize,
    stats: Arc<PipelineStats>,
}

impl<F: Fetch + 'static> BatchScraper<F> {
    /// Create a pool of `workers` workers sharing one fetcher
    pub fn new(fetcher: Arc<F>, workers: usize) -> Self {
        Self {
            fetcher,
            parser: Arc::new(ReviewParser::new()),
            workers: workers.max(1),
            stats: PipelineStats::new(),
        }
    }

    /// Number of workers
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Scrape every URL, returning one record per URL in input order
    pub async fn run(&self, urls: Vec<String>) -> Vec<ScrapedRecord> {
        let total = urls.len();
        self.stats.total_jobs.store(total as u64, Ordering::Relaxed);

        tracing::info!(total, workers = self.workers, "Starting scrape pipeline");

        let buffer = self.workers * 2;
        let (job_tx, job_rx) = mpsc::channel::<ScrapeJob>(buffer);
        let (result_tx, mut result_rx) = mpsc::channel::<JobResult>(buffer);

        let worker_handles = self.spawn_workers(job_rx, result_tx.clone());

        // Spawn result collector
        let stats = Arc::clone(&self.stats);
        let collector: JoinHandle<Vec<Option<ScrapedRecord>>> = tokio::spawn(async move {
            let mut slots: Vec<Option<ScrapedRecord>> = vec![None; total];
            while let Some(result) = result_rx.recv().await {
                match &result {
                    JobResult::Scraped { job_id, .. } => {
                        stats.record_success();
                        tracing::debug!(job_id, "Job completed successfully");
                    }
                    JobResult::Failed { job_id, record, error } => {
                        stats.record_failure();
                        tracing::warn!(job_id, url = %record.url, error, "Job failed");
                    }
                }

                let (job_id, record) = result.into_parts();
                if let Some(slot) = slots.get_mut(job_id) {
                    *slot = Some(record);
                }
            }
            slots
        });

        for (job_id, url) in urls.iter().enumerate() {
            let job = ScrapeJob {
                job_id,
                url: url.clone(),
            };

            if job_tx.send(job).await.is_err() {
                tracing::error!("Failed to send scrape job - channel closed");
                break;
            }
        }

        // Close job channel to signal completion
        drop(job_tx);

        for handle in worker_handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Scrape worker panicked");
            }
        }

        drop(result_tx);
        let slots = match collector.await {
            Ok(slots) => slots,
            Err(e) => {
                tracing::error!(error = %e, "Result collector panicked");
                vec![None; total]
            }
        };

        let records: Vec<ScrapedRecord> = slots
            .into_iter()
            .zip(&urls)
            .map(|(slot, url)| slot.unwrap_or_else(|| ScrapedRecord::empty(url)))
            .collect();

        let snapshot = self.stats.snapshot();
        tracing::info!(
            success = snapshot.success_count,
            failed = snapshot.failed_count,
            "Scrape pipeline completed"
        );

        records
    }

    /// Spawn scrape worker tasks
    fn spawn_workers(
        &self,
        job_rx: mpsc::Receiver<ScrapeJob>,
        result_tx: mpsc::Sender<JobResult>,
    ) -> Vec<JoinHandle<()>> {
        let job_rx = Arc::new(tokio::sync::Mutex::new(job_rx));
        let mut handles = Vec::with_capacity(self.workers);

        for worker_id in 0..self.workers {
            let job_rx = Arc::clone(&job_rx);
            let result_tx = result_tx.clone();
            let fetcher = Arc::clone(&self.fetcher);
            let parser = Arc::clone(&self.parser);

            let handle = tokio::spawn(async move {
                loop {
                    let job = {
                        let mut rx = job_rx.lock().await;
                        rx.recv().await
                    };

                    let Some(job) = job else {
                        break; // Channel closed
                    };

                    tracing::info!(worker_id, url = %job.url, "Scraping review page");

                    let result = match scrape_page(fetcher.as_ref(), &parser, &job.url).await {
                        Ok(record) => JobResult::Scraped {
                            job_id: job.job_id,
                            record,
                        },
                        Err(e) => JobResult::Failed {
                            job_id: job.job_id,
                            record: ScrapedRecord::empty(&job.url),
                            error: e.to_string(),
                        },
                    };

                    if result_tx.send(result).await.is_err() {
                        tracing::error!("Result channel closed");
                        break;
                    }
                }

                tracing::debug!(worker_id, "Scrape worker shutting down");
            });

            handles.push(handle);
        }

        handles
    }

    /// Current statistics
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}
