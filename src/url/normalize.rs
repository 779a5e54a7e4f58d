use url::Url;

/// Normalizes a resolved URL so equivalent links share one serialization
///
/// # Normalization Steps
///
/// 1. Remove fragment (everything after #)
/// 2. Collapse every run of consecutive slashes in the path into one slash
/// 3. Remove an empty query string (trailing `?`); a real query is kept verbatim
///
/// Scheme, host, and query contents are left untouched, and the function is
/// idempotent: normalizing an already normalized URL returns it unchanged.
///
/// # Examples
///
/// ```
/// use sitemap_crawler::url::normalize_url;
/// use url::Url;
///
/// let url = Url::parse("https://example.com//docs///page?#top").unwrap();
/// assert_eq!(normalize_url(url).as_str(), "https://example.com/docs/page");
/// ```
pub fn normalize_url(mut url: Url) -> Url {
    url.set_fragment(None);

    if !url.cannot_be_a_base() && url.path().contains("//") {
        let path = collapse_slashes(url.path());
        url.set_path(&path);
    }

    if url.query() == Some("") {
        url.set_query(None);
    }

    url
}

/// Replaces each run of `/` characters with a single `/`
fn collapse_slashes(path: &str) -> String {
    let mut collapsed = String::with_capacity(path.len());
    let mut previous_slash = false;

    for c in path.chars() {
        if c == '/' {
            if previous_slash {
                continue;
            }
            previous_slash = true;
        } else {
            previous_slash = false;
        }
        collapsed.push(c);
    }

    collapsed
}
