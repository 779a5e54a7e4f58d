//! Robots.txt handling module
//!
//! This module fetches robots.txt once per crawl and turns it into the
//! [`DisallowList`] the coordinator consults for every candidate URL.

mod parser;

pub use parser::{robots_url, DisallowList};

use crate::crawler::Fetcher;
use crate::CrawlerError;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Fetches robots.txt for the crawl rooted at `base_url`
///
/// # Arguments
///
/// * `fetcher` - The fetcher used for the crawl
/// * `base_url` - The crawl's base URL
/// * `cancel` - Cancellation token for the request
///
/// # Returns
///
/// * `Ok(DisallowList)` - Successfully fetched and parsed robots.txt
/// * `Err(CrawlerError)` - Failed to fetch robots.txt
pub async fn fetch_robots(
    fetcher: &dyn Fetcher,
    base_url: &Url,
    cancel: &CancellationToken,
) -> Result<DisallowList, CrawlerError> {
    let url = robots_url(base_url);
    tracing::debug!("Fetching robots.txt: {}", url);

    let page = fetcher
        .fetch(&url, cancel)
        .await
        .map_err(|source| CrawlerError::Fetch {
            url: url.to_string(),
            source,
        })?;

    let content = String::from_utf8_lossy(&page.body);
    Ok(DisallowList::parse(base_url, &content))
}

/// Fetches robots.txt, treating any failure as "no exclusions"
pub async fn fetch_robots_or_allow_all(
    fetcher: &dyn Fetcher,
    base_url: &Url,
    cancel: &CancellationToken,
) -> DisallowList {
    match fetch_robots(fetcher, base_url, cancel).await {
        Ok(robots) => {
            tracing::debug!("robots.txt disallows {} prefixes", robots.prefixes().len());
            robots
        }
        Err(e) => {
            tracing::warn!("Fetching robots rules failed, crawling without exclusions: {}", e);
            DisallowList::allow_all()
        }
    }
}
