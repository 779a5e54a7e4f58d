use serde::Deserialize;

/// Main configuration structure for the sitemap crawler
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub fetcher: FetcherConfig,
    pub server: ServerConfig,
    pub sitemap: SitemapConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of worker tasks in the pool
    pub workers: usize,

    /// Overall crawl deadline (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Initial sizing hint for the frontier queue
    #[serde(rename = "queue-capacity")]
    pub queue_capacity: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            timeout_secs: 10 * 60,
            queue_capacity: 100,
        }
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Timeout for a single request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Upper bound on the number of body bytes read per response
    #[serde(rename = "max-body-bytes")]
    pub max_body_bytes: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: "crawler-bot".to_string(),
            request_timeout_secs: 60,
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the sitemap server binds to
    #[serde(rename = "listen-addr")]
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "localhost:8000".to_string(),
        }
    }
}

/// Sitemap output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Default output format token (`plaintext` or `xml`)
    pub format: String,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            format: "plaintext".to_string(),
        }
    }
}
