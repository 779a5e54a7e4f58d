use std::collections::HashSet;
use url::Url;

/// Set of serialized URLs already accepted into the frontier
///
/// Grows monotonically for the lifetime of one crawl.
#[derive(Debug, Default)]
pub struct History {
    seen: HashSet<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.seen.contains(url.as_str())
    }

    /// Marks the URL as seen; returns false if it already was
    pub fn insert(&mut self, url: &Url) -> bool {
        self.seen.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
