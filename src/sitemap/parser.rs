//! Sitemap document parsing
//!
//! XML sitemaps and sitemap indexes are read with the sitemap crate's
//! streaming reader; plain-text sitemaps list one URL per line.

use sitemap::reader::{SiteMapEntity, SiteMapReader};
use std::io::Cursor;

/// Contents of one sitemap document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSitemap {
    /// Page URLs from `<url><loc>` entries
    pub urls: Vec<String>,

    /// Child sitemaps from `<sitemap><loc>` entries (sitemap index)
    pub child_sitemaps: Vec<String>,
}

impl ParsedSitemap {
    pub fn is_index(&self) -> bool {
        !self.child_sitemaps.is_empty()
    }
}

/// Parses an XML sitemap or sitemap index
///
/// Parsing stops at the first XML error; entries read before it are kept.
pub fn parse_xml_sitemap(xml_data: &[u8]) -> ParsedSitemap {
    let mut parsed = ParsedSitemap::default();

    for entity in SiteMapReader::new(Cursor::new(xml_data)) {
        match entity {
            SiteMapEntity::Url(url_entry) => {
                if let Some(url) = url_entry.loc.get_url() {
                    parsed.urls.push(url.to_string());
                }
            }
            SiteMapEntity::SiteMap(sitemap_entry) => {
                if let Some(url) = sitemap_entry.loc.get_url() {
                    parsed.child_sitemaps.push(url.to_string());
                }
            }
            SiteMapEntity::Err(error) => {
                tracing::debug!("Stopping at malformed sitemap XML: {}", error);
                break;
            }
        }
    }

    parsed
}

/// Parses a text sitemap: every line starting with `http` is a URL
pub fn parse_text_sitemap(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.starts_with("http://") || line.starts_with("https://"))
        .map(str::to_string)
        .collect()
}

/// True when the body looks like XML rather than plain text
pub fn looks_like_xml(body: &[u8]) -> bool {
    let text = String::from_utf8_lossy(&body[..body.len().min(512)]);
    text.trim_start_matches('\u{feff}').trim_start().starts_with('<')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_urlset() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://example.edu/</loc><lastmod>2024-01-01</lastmod></url>
  <url><loc>https://example.edu/papers/a.pdf</loc></url>
</urlset>"#;
        let parsed = parse_xml_sitemap(xml);
        assert_eq!(
            parsed.urls,
            vec![
                "https://example.edu/".to_string(),
                "https://example.edu/papers/a.pdf".to_string()
            ]
        );
        assert!(!parsed.is_index());
    }

    #[test]
    fn test_parse_sitemap_index() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>https://example.edu/sitemap-pages.xml</loc></sitemap>
  <sitemap><loc>https://example.edu/sitemap-docs.xml</loc></sitemap>
</sitemapindex>"#;
        let parsed = parse_xml_sitemap(xml);
        assert!(parsed.is_index());
        assert_eq!(parsed.child_sitemaps.len(), 2);
        assert!(parsed.urls.is_empty());
    }

    #[test]
    fn test_garbage_xml_yields_nothing() {
        let parsed = parse_xml_sitemap(b"<<<not xml at all");
        assert!(parsed.urls.is_empty());
        assert!(parsed.child_sitemaps.is_empty());
    }

    #[test]
    fn test_parse_text_sitemap() {
        let text = "https://example.edu/a\n\n  http://example.edu/b  \n# comment\nftp://x/y\n";
        assert_eq!(
            parse_text_sitemap(text),
            vec![
                "https://example.edu/a".to_string(),
                "http://example.edu/b".to_string()
            ]
        );
    }

    #[test]
    fn test_looks_like_xml() {
        assert!(looks_like_xml(b"  <?xml version=\"1.0\"?><urlset/>"));
        assert!(looks_like_xml("\u{feff}<urlset/>".as_bytes()));
        assert!(!looks_like_xml(b"https://example.edu/a\n"));
    }
}
