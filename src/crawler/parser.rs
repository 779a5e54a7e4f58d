//! HTML link extraction
//!
//! Turns a fetched page body into the ordered list of absolute, normalized
//! URLs it links to.

use crate::url::normalize_url;
use crate::CrawlerError;
use scraper::{Html, Selector};
use url::Url;

/// Extracts every anchor `href` from an HTML body
///
/// # Extraction Rules
///
/// 1. Walk the document in order and collect `href` values of `<a>` elements
/// 2. Resolve each one against `base_url` (relative paths, absolute paths,
///    absolute and scheme-relative URLs are all supported)
/// 3. Normalize the result (see [`normalize_url`])
///
/// Hrefs that cannot be resolved are skipped. No scheme or host filtering
/// happens here; scoping is the coordinator's job.
///
/// # Arguments
///
/// * `base_url` - The URL the body was fetched from
/// * `body` - Raw response body
///
/// # Returns
///
/// * `Ok(Vec<Url>)` - Links in document order
/// * `Err(CrawlerError::Parse)` - The body is not UTF-8 text
///
/// # Example
///
/// ```
/// use sitemap_crawler::crawler::extract_urls;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/").unwrap();
/// let html = br#"<html><body><a href="intro">Intro</a></body></html>"#;
/// let urls = extract_urls(&base, html).unwrap();
/// assert_eq!(urls[0].as_str(), "https://example.com/docs/intro");
/// ```
pub fn extract_urls(base_url: &Url, body: &[u8]) -> Result<Vec<Url>, CrawlerError> {
    let html = std::str::from_utf8(body).map_err(|e| CrawlerError::Parse {
        url: base_url.to_string(),
        message: e.to_string(),
    })?;

    let document = Html::parse_document(html);
    let mut urls = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                match base_url.join(href) {
                    Ok(resolved) => urls.push(normalize_url(resolved)),
                    Err(e) => tracing::trace!("Skipping href {:?}: {}", href, e),
                }
            }
        }
    }

    Ok(urls)
}
