//! Plaintext sitemap: one absolute URL per line

use crate::sitemap::SitemapEntry;

pub(crate) fn generate_plaintext(entries: &[SitemapEntry]) -> Vec<u8> {
    let mut out = String::new();
    for entry in entries {
        out.push_str(entry.location.as_str());
        out.push('\n');
    }
    out.into_bytes()
}
