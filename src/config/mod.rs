//! Configuration module for the sitemap crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every field has a default, so running without a config file is supported.
//!
//! # Example
//!
//! ```no_run
//! use sitemap_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, FetcherConfig, ServerConfig, SitemapConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config, LISTEN_ADDR_ENV};
