//! Sitemap Crawler: a same-site crawler that emits sitemaps
//!
//! This crate crawls a website from a base URL with a fixed pool of workers,
//! honours a minimal robots.txt `Disallow` subset, and renders the discovered
//! pages as a plaintext or Sitemap Protocol 0.9 XML document.

pub mod config;
pub mod crawler;
pub mod robots;
pub mod server;
pub mod service;
pub mod sitemap;
pub mod url;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch {url}: {source}")]
    Fetch { url: String, source: FetchError },

    #[error("Failed to parse body of {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Unsupported sitemap format '{0}'")]
    UnsupportedFormat(String),

    #[error("Unsupported URL scheme '{0}', expected http or https")]
    UnsupportedScheme(String),

    #[error("Crawl cancelled")]
    Cancelled,

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),
}

/// Errors reported by a [`crawler::Fetcher`]
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid status code {status}")]
    InvalidStatus { status: u16 },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetch cancelled")]
    Cancelled,
}

impl FetchError {
    /// HTTP status that came with the failure, if a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidStatus { status } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Cancelled => None,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{extract_urls, Coordinator, Fetcher, FetcherFactory};
pub use service::SitemapService;
pub use sitemap::{Sitemap, SitemapEntry, SitemapFormat};
pub use crate::url::{normalize_url, parse_base_url};
