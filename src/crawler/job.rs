use crate::CrawlerError;
use url::Url;

/// A single URL handed to a worker
#[derive(Debug, Clone)]
pub struct Job {
    pub url: Url,
}

/// Outcome of one [`Job`], produced exactly once per dispatched job
#[derive(Debug)]
pub struct JobResult {
    /// The URL that was fetched
    pub url: Url,

    /// Links discovered on the page (empty on failure)
    pub urls: Vec<Url>,

    /// HTTP status code, if a response was received
    pub status: Option<u16>,

    /// Fetch or parse failure for this URL
    pub error: Option<CrawlerError>,
}

impl JobResult {
    pub fn success(url: Url, status: u16, urls: Vec<Url>) -> Self {
        Self {
            url,
            urls,
            status: Some(status),
            error: None,
        }
    }

    pub fn failure(url: Url, status: Option<u16>, error: CrawlerError) -> Self {
        Self {
            url,
            urls: Vec::new(),
            status,
            error: Some(error),
        }
    }
}
