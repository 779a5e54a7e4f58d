//! robots.txt `Disallow` parsing
//!
//! Only a flat subset is understood: every line that starts with the literal,
//! case-sensitive `Disallow: ` contributes one prefix. User-agent groups,
//! wildcards, and `Allow` overrides are ignored, so the whole file is read as
//! a single list.

use url::Url;

/// Directive recognised by the parser (note the single trailing space)
const DISALLOW_DIRECTIVE: &str = "Disallow: ";

/// Ordered list of absolute URL prefixes excluded from the crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisallowList {
    prefixes: Vec<String>,
}

impl DisallowList {
    /// An empty list that excludes nothing
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Builds the list from raw robots.txt content
    ///
    /// Each `Disallow: <path>` line becomes `base_url` with its path replaced
    /// by `<path>`, serialized to a string. A blank `<path>` leaves the bare
    /// origin, which excludes every URL on the host.
    ///
    /// # Example
    ///
    /// ```
    /// use sitemap_crawler::robots::DisallowList;
    /// use url::Url;
    ///
    /// let base = Url::parse("https://example.com").unwrap();
    /// let list = DisallowList::parse(&base, "User-agent: *\nDisallow: /admin\n");
    /// assert_eq!(list.prefixes(), ["https://example.com/admin"]);
    /// ```
    pub fn parse(base_url: &Url, content: &str) -> Self {
        let prefixes = content
            .lines()
            .filter_map(|line| line.strip_prefix(DISALLOW_DIRECTIVE))
            .map(|path| {
                let mut prefix = base_url.clone();
                prefix.set_path(path);
                prefix.to_string()
            })
            .collect();

        Self { prefixes }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Returns true if the serialized URL starts with any disallowed prefix
    pub fn is_disallowed(&self, url: &Url) -> bool {
        let raw = url.as_str();
        self.prefixes.iter().any(|prefix| raw.starts_with(prefix))
    }
}

/// Location of robots.txt for a crawl rooted at `base_url`
///
/// `/robots.txt` is appended to the base path, so a crawl of
/// `https://example.com/docs` reads `https://example.com/docs/robots.txt`.
pub fn robots_url(base_url: &Url) -> Url {
    let mut robots = base_url.clone();
    let path = format!("{}/robots.txt", base_url.path().trim_end_matches('/'));
    robots.set_path(&path);
    robots
}
