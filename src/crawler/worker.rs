//! Crawl worker
//!
//! A worker takes jobs from the shared job channel, fetches the page, extracts
//! its links, and sends exactly one [`JobResult`] back per job. Workers keep
//! no state between jobs and never touch the coordinator's queue, history, or
//! sitemap.

use crate::crawler::job::{Job, JobResult};
use crate::crawler::parser::extract_urls;
use crate::crawler::Fetcher;
use crate::CrawlerError;
use flume::{Receiver, Sender};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct Worker {
    id: usize,
    fetcher: Arc<dyn Fetcher>,
}

impl Worker {
    pub fn new(id: usize, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { id, fetcher }
    }

    /// Processes jobs until `cancel` fires or the channels close
    ///
    /// Every wait (next job, fetch, result hand-off) also waits on `cancel`, so
    /// the future completes promptly after cancellation even mid-fetch.
    pub async fn run(self, jobs: Receiver<Job>, results: Sender<JobResult>, cancel: CancellationToken) {
        loop {
            let job = tokio::select! {
                _ = cancel.cancelled() => break,
                job = jobs.recv_async() => match job {
                    Ok(job) => job,
                    Err(_) => break,
                },
            };

            let result = tokio::select! {
                _ = cancel.cancelled() => break,
                result = self.process_job(job, &cancel) => result,
            };

            tokio::select! {
                _ = cancel.cancelled() => break,
                sent = results.send_async(result) => {
                    if sent.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::debug!("Worker {} exited", self.id);
    }

    async fn process_job(&self, job: Job, cancel: &CancellationToken) -> JobResult {
        let page = match self.fetcher.fetch(&job.url, cancel).await {
            Ok(page) => page,
            Err(source) => {
                let status = source.status();
                let error = CrawlerError::Fetch {
                    url: job.url.to_string(),
                    source,
                };
                return JobResult::failure(job.url, status, error);
            }
        };

        match extract_urls(&job.url, &page.body) {
            Ok(urls) => JobResult::success(job.url, page.status, urls),
            Err(e) => JobResult::failure(job.url, Some(page.status), e),
        }
    }
}
