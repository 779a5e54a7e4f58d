//! Sitemap accumulation and rendering
//!
//! This module handles:
//! - Accumulating accepted pages in discovery order
//! - Rendering them as a plaintext list or a Sitemap Protocol 0.9 document
//! - Validating requested output formats

mod entry;
mod plaintext;
mod xml;

pub use entry::{ChangeFrequency, SitemapEntry};
pub use xml::SITEMAP_XMLNS;

use crate::CrawlerError;
use std::fmt;
use std::str::FromStr;

/// Output format of a rendered sitemap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SitemapFormat {
    /// Newline-delimited absolute URLs
    #[default]
    Plaintext,
    /// Sitemap Protocol 0.9 XML
    Xml,
}

impl SitemapFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plaintext => "plaintext",
            Self::Xml => "xml",
        }
    }

    /// MIME type to serve the rendered sitemap with
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Plaintext => "text/plain; charset=utf-8",
            Self::Xml => "application/xml",
        }
    }
}

impl fmt::Display for SitemapFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SitemapFormat {
    type Err = CrawlerError;

    /// Parses a format token; anything but `plaintext` or `xml` is rejected
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plaintext" => Ok(Self::Plaintext),
            "xml" => Ok(Self::Xml),
            other => Err(CrawlerError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Append-only list of sitemap entries in acceptance order
///
/// Deduplication is not done here; the crawl coordinator only adds URLs it
/// has not seen before.
#[derive(Debug, Clone, Default)]
pub struct Sitemap {
    entries: Vec<SitemapEntry>,
}

impl Sitemap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry to the end of the sitemap
    pub fn add_entry(&mut self, entry: SitemapEntry) {
        self.entries.push(entry);
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[SitemapEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the sitemap in the requested format
    ///
    /// # Example
    ///
    /// ```
    /// use sitemap_crawler::sitemap::{Sitemap, SitemapEntry, SitemapFormat};
    /// use url::Url;
    ///
    /// let mut sitemap = Sitemap::new();
    /// sitemap.add_entry(SitemapEntry::new(Url::parse("https://example.com/a").unwrap()));
    /// let body = sitemap.generate(SitemapFormat::Plaintext);
    /// assert_eq!(body, b"https://example.com/a\n");
    /// ```
    pub fn generate(&self, format: SitemapFormat) -> Vec<u8> {
        match format {
            SitemapFormat::Plaintext => plaintext::generate_plaintext(&self.entries),
            SitemapFormat::Xml => xml::generate_xml(&self.entries),
        }
    }
}
