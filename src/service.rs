//! Sitemap generation service
//!
//! Entry point shared by the CLI and the HTTP server: one call runs a fresh
//! crawl and renders its result.

use crate::config::CrawlerConfig;
use crate::crawler::{Coordinator, FetcherFactory};
use crate::sitemap::SitemapFormat;
use crate::CrawlerError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

#[derive(Clone)]
pub struct SitemapService {
    fetcher_factory: Arc<dyn FetcherFactory>,
    crawler: CrawlerConfig,
}

impl SitemapService {
    pub fn new(fetcher_factory: Arc<dyn FetcherFactory>, crawler: CrawlerConfig) -> Self {
        Self {
            fetcher_factory,
            crawler,
        }
    }

    /// Crawls the site rooted at `base_url` and renders it in `format`
    ///
    /// Every call builds its own coordinator, so concurrent calls share no
    /// crawl state.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<u8>)` - The rendered sitemap
    /// * `Err(CrawlerError::Cancelled)` - The crawl hit its deadline or `cancel` fired
    pub async fn generate_sitemap(
        &self,
        cancel: &CancellationToken,
        base_url: Url,
        format: SitemapFormat,
    ) -> Result<Vec<u8>, CrawlerError> {
        let coordinator =
            Coordinator::from_config(&self.crawler, base_url, Arc::clone(&self.fetcher_factory));
        let sitemap = coordinator.run(cancel).await?;
        Ok(sitemap.generate(format))
    }
}
