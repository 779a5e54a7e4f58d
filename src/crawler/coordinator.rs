//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns every piece of per-crawl state and is the only task
//! that touches it:
//! - the frontier queue and the seen history
//! - the robots.txt disallow list
//! - the sitemap being accumulated
//!
//! Workers are reached only through two rendezvous channels, one for jobs and
//! one for results. The coordinator counts idle workers to decide when the
//! crawl is finished.

use crate::config::CrawlerConfig;
use crate::crawler::history::History;
use crate::crawler::job::{Job, JobResult};
use crate::crawler::queue::{FrontierQueue, DEFAULT_QUEUE_CAPACITY};
use crate::crawler::worker::Worker;
use crate::crawler::FetcherFactory;
use crate::robots::{fetch_robots_or_allow_all, DisallowList};
use crate::sitemap::{Sitemap, SitemapEntry};
use crate::url::{same_host, within_base};
use crate::CrawlerError;
use flume::r#async::SendFut;
use flume::{Receiver, Sender};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Default number of workers in the pool
pub const DEFAULT_WORKERS: usize = 10;

/// Default overall crawl deadline
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Deadline used when the configured timeout does not fit in an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(30 * 365 * 24 * 60 * 60);

/// A job handed to the job channel but not yet taken by a worker
type PendingDispatch = Pin<Box<SendFut<'static, Job>>>;

/// Main crawler coordinator structure
///
/// One coordinator runs exactly one crawl; [`Coordinator::run`] consumes it.
pub struct Coordinator {
    base_url: Url,
    workers: usize,
    timeout: Duration,
    fetcher_factory: Arc<dyn FetcherFactory>,
    queue: FrontierQueue,
    history: History,
    sitemap: Sitemap,
    disallowed: DisallowList,
}

impl Coordinator {
    /// Creates a coordinator with the default pool size and deadline
    ///
    /// # Arguments
    ///
    /// * `base_url` - Root of the site to crawl; also the scope prefix
    /// * `fetcher_factory` - Supplies the fetcher shared by the crawl's workers
    pub fn new(base_url: Url, fetcher_factory: Arc<dyn FetcherFactory>) -> Self {
        Self {
            base_url,
            workers: DEFAULT_WORKERS,
            timeout: DEFAULT_TIMEOUT,
            fetcher_factory,
            queue: FrontierQueue::with_capacity(DEFAULT_QUEUE_CAPACITY),
            history: History::new(),
            sitemap: Sitemap::new(),
            disallowed: DisallowList::allow_all(),
        }
    }

    /// Creates a coordinator sized by the `[crawler]` configuration section
    pub fn from_config(
        config: &CrawlerConfig,
        base_url: Url,
        fetcher_factory: Arc<dyn FetcherFactory>,
    ) -> Self {
        Self::new(base_url, fetcher_factory)
            .with_workers(config.workers)
            .with_timeout(Duration::from_secs(config.timeout_secs))
            .with_queue_capacity(config.queue_capacity)
    }

    /// Sets the worker pool size (at least one worker always runs)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue = FrontierQueue::with_capacity(capacity);
        self
    }

    /// Runs the crawl to completion
    ///
    /// 1. Fetch robots.txt and build the disallow list (failures are logged
    ///    and crawling continues without exclusions)
    /// 2. Start the worker pool
    /// 3. Seed the frontier with the base URL
    /// 4. Dispatch jobs and apply results until the frontier is empty and
    ///    every worker is idle
    ///
    /// All workers have exited by the time this returns, whatever the outcome.
    ///
    /// # Returns
    ///
    /// * `Ok(Sitemap)` - Every reachable in-scope page, in acceptance order
    /// * `Err(CrawlerError::Cancelled)` - The deadline passed or `cancel` fired
    pub async fn run(mut self, cancel: &CancellationToken) -> Result<Sitemap, CrawlerError> {
        tracing::info!("Starting crawl of {}", self.base_url);

        let fetcher = self.fetcher_factory.create();
        self.disallowed = fetch_robots_or_allow_all(fetcher.as_ref(), &self.base_url, cancel).await;
        if cancel.is_cancelled() {
            return Err(CrawlerError::Cancelled);
        }

        let now = Instant::now();
        let deadline = now
            .checked_add(self.timeout)
            .unwrap_or_else(|| now + FAR_FUTURE);
        let crawl_cancel = cancel.child_token();

        let (jobs_tx, jobs_rx) = flume::bounded::<Job>(0);
        let (results_tx, results_rx) = flume::bounded::<JobResult>(0);

        let mut pool = JoinSet::new();
        for id in 0..self.workers {
            let worker = Worker::new(id, Arc::clone(&fetcher));
            pool.spawn(worker.run(jobs_rx.clone(), results_tx.clone(), crawl_cancel.clone()));
        }
        drop(jobs_rx);
        drop(results_tx);

        let seed = self.base_url.clone();
        self.add_url(seed);

        let outcome = self.schedule(jobs_tx, results_rx, deadline, &crawl_cancel).await;

        // Stop the pool and wait for every worker, on success and failure alike
        crawl_cancel.cancel();
        while let Some(joined) = pool.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Worker task failed: {}", e);
            }
        }

        outcome?;
        tracing::info!("Crawl of {} complete: {} pages", self.base_url, self.sitemap.len());
        Ok(self.sitemap)
    }

    async fn schedule(
        &mut self,
        jobs: Sender<Job>,
        results: Receiver<JobResult>,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> Result<(), CrawlerError> {
        let deadline = tokio::time::sleep_until(deadline);
        tokio::pin!(deadline);

        let mut idle = self.workers;
        let mut dispatch: Option<PendingDispatch> = None;

        loop {
            // A job that lost the last race stays pending; only pop when there is none
            if dispatch.is_none() {
                dispatch = self
                    .queue
                    .pop()
                    .map(|url| Box::pin(jobs.clone().into_send_async(Job { url })));
            }

            if dispatch.is_none() && idle == self.workers {
                return Ok(());
            }

            tokio::select! {
                sent = wait_dispatch(&mut dispatch) => {
                    dispatch = None;
                    if sent.is_err() {
                        tracing::error!("All workers exited before the crawl finished");
                        return Err(CrawlerError::Cancelled);
                    }
                    idle -= 1;
                }
                result = results.recv_async() => match result {
                    Ok(result) => {
                        idle += 1;
                        self.handle_result(result);
                    }
                    Err(_) => {
                        tracing::error!("All workers exited before the crawl finished");
                        return Err(CrawlerError::Cancelled);
                    }
                },
                _ = &mut deadline => {
                    tracing::warn!("Crawl deadline of {:?} reached", self.timeout);
                    return Err(CrawlerError::Cancelled);
                }
                _ = cancel.cancelled() => {
                    tracing::info!("Crawl cancelled");
                    return Err(CrawlerError::Cancelled);
                }
            }
        }
    }

    fn handle_result(&mut self, result: JobResult) {
        if result.status == Some(404) {
            return;
        }

        if let Some(e) = &result.error {
            tracing::info!("Fetching {} failed: {}", result.url, e);
        } else if result.status != Some(200) {
            tracing::info!("Fetching {} returned status {:?}", result.url, result.status);
        }

        for url in result.urls {
            self.add_url(url);
        }
    }

    /// Accepts a URL into the crawl if it passes every scope check
    ///
    /// Checks run in order: same host, under the base URL, not disallowed by
    /// robots.txt, not seen before. An accepted URL gets a sitemap entry, is
    /// marked seen, and joins the frontier.
    fn add_url(&mut self, url: Url) -> bool {
        if !same_host(&url, &self.base_url)
            || !within_base(&url, &self.base_url)
            || self.disallowed.is_disallowed(&url)
            || self.history.contains(&url)
        {
            return false;
        }

        self.sitemap.add_entry(SitemapEntry::new(url.clone()));
        self.history.insert(&url);
        self.queue.push(url);
        true
    }
}

async fn wait_dispatch(
    dispatch: &mut Option<PendingDispatch>,
) -> Result<(), flume::SendError<Job>> {
    match dispatch {
        Some(send) => send.await,
        None => std::future::pending().await,
    }
}

/// Runs a single crawl with the given settings
///
/// # Arguments
///
/// * `config` - Pool size, deadline, and queue sizing
/// * `base_url` - Root of the site to crawl
/// * `fetcher_factory` - Supplies the crawl's fetcher
/// * `cancel` - Aborts the crawl when cancelled
///
/// # Example
///
/// ```no_run
/// use sitemap_crawler::config::{CrawlerConfig, FetcherConfig};
/// use sitemap_crawler::crawler::{run_crawl, HttpFetcherFactory};
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let factory = Arc::new(HttpFetcherFactory::new(&FetcherConfig::default())?);
/// let base = Url::parse("https://example.com/")?;
/// let sitemap = run_crawl(&CrawlerConfig::default(), base, factory, &CancellationToken::new()).await?;
/// println!("{} pages", sitemap.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &CrawlerConfig,
    base_url: Url,
    fetcher_factory: Arc<dyn FetcherFactory>,
    cancel: &CancellationToken,
) -> Result<Sitemap, CrawlerError> {
    Coordinator::from_config(config, base_url, fetcher_factory)
        .run(cancel)
        .await
}
