//! HTML link extraction
//!
//! The crawl core depends on the [`LinkExtractor`] trait; the scraper-based
//! [`ScraperLinkExtractor`] is the default implementation.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// A link as it appears in the page, before resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLink {
    /// The href attribute, untouched
    pub href: String,

    /// Anchor text, whitespace-collapsed
    pub text: String,

    /// Text of the nearest enclosing block element, whitespace-collapsed
    pub context: String,
}

/// Elements that sit inside running text; context is taken from the first
/// ancestor that is not one of these
const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "cite", "code", "em", "font", "i", "kbd", "label", "mark",
    "q", "s", "small", "span", "strong", "sub", "sup", "time", "u",
];

/// Pulls `<a href>`-style links out of an HTML document
pub trait LinkExtractor: Send + Sync {
    /// Extracts links from `body`
    ///
    /// With a `scope_selector`, only links inside matching elements are
    /// returned. Malformed HTML yields whatever links can be recovered.
    fn extract_links(&self, body: &str, scope_selector: Option<&str>) -> Vec<RawLink>;
}

/// [`LinkExtractor`] built on the scraper crate
#[derive(Debug, Clone)]
pub struct ScraperLinkExtractor {
    text_chars: usize,
    context_chars: usize,
}

impl ScraperLinkExtractor {
    /// # Arguments
    ///
    /// * `text_chars` - Maximum characters of anchor text kept
    /// * `context_chars` - Maximum characters of surrounding text kept
    pub fn new(text_chars: usize, context_chars: usize) -> Self {
        Self {
            text_chars,
            context_chars,
        }
    }

    fn raw_link(&self, anchor: ElementRef<'_>) -> Option<RawLink> {
        let href = anchor.value().attr("href")?.trim();
        if href.is_empty() {
            return None;
        }

        let text = anchor
            .value()
            .attr("title")
            .filter(|_| anchor.text().all(|t| t.trim().is_empty()))
            .map(collapse_whitespace)
            .unwrap_or_else(|| collapse_whitespace(&anchor.text().collect::<String>()));

        let context = anchor
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|element| !INLINE_ELEMENTS.contains(&element.value().name()))
            .map(|block| collapse_whitespace(&block.text().collect::<String>()))
            .unwrap_or_default();

        Some(RawLink {
            href: href.to_string(),
            text: truncate_chars(&text, self.text_chars),
            context: truncate_chars(&context, self.context_chars),
        })
    }
}

impl Default for ScraperLinkExtractor {
    fn default() -> Self {
        Self::new(200, 500)
    }
}

impl LinkExtractor for ScraperLinkExtractor {
    fn extract_links(&self, body: &str, scope_selector: Option<&str>) -> Vec<RawLink> {
        let document = Html::parse_document(body);
        let Ok(anchor_selector) = Selector::parse("a[href], area[href]") else {
            return Vec::new();
        };

        let scope = scope_selector.and_then(|s| match Selector::parse(s) {
            Ok(selector) => Some(selector),
            Err(e) => {
                tracing::warn!("Ignoring invalid scope selector '{}': {:?}", s, e);
                None
            }
        });

        match scope {
            Some(scope) => {
                // Nested scope matches would otherwise report the same anchor twice
                let mut seen = HashSet::new();
                document
                    .select(&scope)
                    .flat_map(|container| container.select(&anchor_selector))
                    .filter(|anchor| seen.insert(anchor.id()))
                    .filter_map(|anchor| self.raw_link(anchor))
                    .collect()
            }
            None => document
                .select(&anchor_selector)
                .filter_map(|anchor| self.raw_link(anchor))
                .collect(),
        }
    }
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url)
    } else {
        None
    }
}

/// Collapses runs of whitespace into single spaces and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keeps at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
