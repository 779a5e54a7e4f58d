//! URL handling module for the sitemap crawler
//!
//! This module provides URL normalization and the scoping checks the crawl
//! applies to every discovered link.

mod normalize;

use crate::CrawlerError;
use url::Url;

// Re-export main functions
pub use normalize::normalize_url;

/// Returns true if `url` is served by the same host as `base`
///
/// Only the host is compared; scheme and port are covered by the prefix check.
pub fn same_host(url: &Url, base: &Url) -> bool {
    url.host_str() == base.host_str()
}

/// Returns true if the serialized `url` lies under the serialized `base`
///
/// This scopes a crawl to the base URL's path subtree, not merely its host:
/// with base `https://example.com/docs`, `https://example.com/blog` is out of scope.
pub fn within_base(url: &Url, base: &Url) -> bool {
    url.as_str().starts_with(base.as_str())
}

/// Parses a user-supplied crawl root
///
/// Only absolute `http` and `https` URLs can be crawled.
pub fn parse_base_url(raw: &str) -> Result<Url, CrawlerError> {
    let url = Url::parse(raw.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(CrawlerError::UnsupportedScheme(other.to_string())),
    }
}
