//! Sitemap Protocol 0.9 XML rendering

use crate::sitemap::SitemapEntry;
use std::fmt::Write;

/// Namespace of the Sitemap Protocol 0.9 `urlset` element
pub const SITEMAP_XMLNS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

pub(crate) fn generate_xml(entries: &[SitemapEntry]) -> Vec<u8> {
    let mut out = String::with_capacity(64 + entries.len() * 64);

    out.push_str(r#"<urlset xmlns=""#);
    out.push_str(SITEMAP_XMLNS);
    out.push_str(r#"">"#);

    for entry in entries {
        out.push_str("<url><loc>");
        out.push_str(&escape_xml(entry.location.as_str()));
        out.push_str("</loc>");

        if let Some(change_frequency) = entry.change_frequency {
            out.push_str("<changefreq>");
            out.push_str(change_frequency.as_str());
            out.push_str("</changefreq>");
        }

        if let Some(priority) = entry.priority.filter(|p| *p != 0.0) {
            // Writing into a String cannot fail
            let _ = write!(out, "<priority>{}</priority>", priority);
        }

        out.push_str("</url>");
    }

    out.push_str("</urlset>");
    out.into_bytes()
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
