//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`Fetcher`] seam
//! - HTML link extraction
//! - The frontier queue and seen history
//! - Worker pool and overall crawl coordination

mod coordinator;
mod fetcher;
mod history;
mod job;
mod parser;
mod queue;
mod worker;

pub use coordinator::{run_crawl, Coordinator, DEFAULT_TIMEOUT, DEFAULT_WORKERS};
pub use fetcher::{
    build_http_client, Fetcher, FetcherFactory, HttpFetcher, HttpFetcherFactory, Page,
};
pub use history::History;
pub use job::{Job, JobResult};
pub use parser::extract_urls;
pub use queue::{FrontierQueue, DEFAULT_QUEUE_CAPACITY};
pub use worker::Worker;
