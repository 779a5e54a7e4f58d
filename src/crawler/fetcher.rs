//! Page fetching
//!
//! This module defines the fetcher seam the crawl depends on and the
//! `reqwest` implementation used in production:
//! - [`Fetcher`]: retrieves one URL, honouring cancellation
//! - [`FetcherFactory`]: hands each crawl its own fetcher
//! - [`HttpFetcher`]: HTTP GET with a user agent, timeout, and body cap

use crate::config::FetcherConfig;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct Page {
    /// HTTP status code (always 2xx)
    pub status: u16,

    /// Response body, possibly truncated to the fetcher's size cap
    pub body: Vec<u8>,
}

/// Retrieves the contents of web pages
///
/// Implementations must return promptly once `cancel` fires, report non-2xx
/// responses as [`FetchError::InvalidStatus`], and bound the size of the body
/// they read.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url, cancel: &CancellationToken) -> Result<Page, FetchError>;
}

/// Creates the fetcher used by a single crawl
pub trait FetcherFactory: Send + Sync {
    fn create(&self) -> Arc<dyn Fetcher>;
}

impl<F> FetcherFactory for F
where
    F: Fn() -> Arc<dyn Fetcher> + Send + Sync,
{
    fn create(&self) -> Arc<dyn Fetcher> {
        self()
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sitemap_crawler::config::FetcherConfig;
/// use sitemap_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    pub fn new(client: Client, max_body_bytes: usize) -> Self {
        Self {
            client,
            max_body_bytes,
        }
    }

    /// Builds a fetcher from configuration
    pub fn from_config(config: &FetcherConfig) -> Result<Self, FetchError> {
        Ok(Self::new(build_http_client(config)?, config.max_body_bytes))
    }

    async fn get(&self, url: &Url) -> Result<Page, FetchError> {
        tracing::debug!("Fetching URL: {}", url);

        let mut response = self.client.get(url.as_str()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::InvalidStatus {
                status: status.as_u16(),
            });
        }

        // Read at most max_body_bytes, whatever the server sends
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let remaining = self.max_body_bytes - body.len();
            if chunk.len() >= remaining {
                body.extend_from_slice(&chunk[..remaining]);
                tracing::debug!("Body of {} truncated at {} bytes", url, self.max_body_bytes);
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(Page {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, cancel: &CancellationToken) -> Result<Page, FetchError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            page = self.get(url) => page,
        }
    }
}

/// Factory handing every crawl a fresh [`HttpFetcher`]
///
/// The underlying client (and its connection pool) is built once and shared.
#[derive(Debug, Clone)]
pub struct HttpFetcherFactory {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcherFactory {
    pub fn new(config: &FetcherConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_http_client(config)?,
            max_body_bytes: config.max_body_bytes,
        })
    }
}

impl FetcherFactory for HttpFetcherFactory {
    fn create(&self) -> Arc<dyn Fetcher> {
        Arc::new(HttpFetcher::new(self.client.clone(), self.max_body_bytes))
    }
}
