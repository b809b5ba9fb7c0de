//! PDF classification
//!
//! This module handles:
//! - Deciding whether a discovered link is a PDF
//! - Extracting title, author, ISBN, year and size heuristically
//! - Scoring how likely the document is a book
//!
//! The classifier is pure: it never performs requests itself. Probe results
//! (HEAD or range requests made by the crawler) are passed in.

mod metadata;
mod scoring;

pub use metadata::{
    clean_title, extract_author, extract_isbn, extract_title, extract_year, file_stem,
    filename_from_url, is_likely_person_name, AuthorMatch,
};
pub use scoring::{confidence, ScoreSignals};

use crate::config::{CrawlMode, PdfConfig};
use crate::crawler::ProbeInfo;
use crate::hosts::{HostRegistry, RequestSpec, EXTERNAL_SERVICE_CONTENT_TYPE};
use crate::url::extract_domain;
use crate::ConfigError;
use chrono::{DateTime, Datelike, Utc};
use regex::Regex;
use url::Url;

/// Hosts whose links are share buttons, never documents
const SOCIAL_HOSTS: &[&str] = &[
    "pinterest.com",
    "tumblr.com",
    "reddit.com",
    "facebook.com",
    "twitter.com",
    "linkedin.com",
    "share.flipboard.com",
];

/// Which rules apply to discovered PDFs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringVariant {
    /// Every PDF within the size limits is kept
    Site,
    /// Every PDF is kept; size feeds the book confidence score
    Book,
}

impl From<CrawlMode> for ScoringVariant {
    fn from(mode: CrawlMode) -> Self {
        match mode {
            CrawlMode::Site => Self::Site,
            CrawlMode::Book => Self::Book,
        }
    }
}

/// A link being classified, with where it was found
#[derive(Debug, Clone, Copy)]
pub struct PdfLink<'a> {
    pub url: &'a Url,
    pub link_text: &'a str,
    pub link_context: &'a str,
    pub discovered_on_page: &'a str,
    /// Depth of the page the link was found on
    pub depth: u32,
}

/// A discovered PDF document
#[derive(Debug, Clone, PartialEq)]
pub struct PdfDocumentRecord {
    pub url: String,
    pub title: String,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub publication_year: Option<i32>,
    pub file_size_bytes: Option<u64>,
    pub content_type: Option<String>,
    pub last_modified: Option<String>,
    pub discovered_on_page: String,
    pub discovery_timestamp: DateTime<Utc>,
    /// None when the link was never requested
    pub http_status: Option<u16>,
    pub depth: u32,
    pub link_text: String,
    pub link_context: String,
    pub domain: String,
    /// Book likelihood in `[0, 1]`
    pub confidence_score: f64,
}

impl PdfDocumentRecord {
    pub fn file_size_mb(&self) -> Option<f64> {
        self.file_size_bytes
            .map(|bytes| bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Why a link produced no record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NotPdf,
    SocialHost,
    TooSmall { size: u64 },
    TooLarge { size: u64 },
}

/// Turns discovered links into [`PdfDocumentRecord`]s
pub struct PdfClassifier {
    variant: ScoringVariant,
    book_patterns: Vec<Regex>,
    query_patterns: Vec<Regex>,
    book_keywords: Vec<String>,
    min_pdf_size: u64,
    max_pdf_size: u64,
    min_book_size: u64,
    hosts: HostRegistry,
}

impl PdfClassifier {
    /// Compiles the configured patterns
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` for a pattern that does not compile.
    pub fn new(config: &PdfConfig, variant: ScoringVariant) -> Result<Self, ConfigError> {
        Ok(Self {
            variant,
            book_patterns: compile_patterns(&config.book_patterns)?,
            query_patterns: compile_patterns(&config.pdf_query_patterns)?,
            book_keywords: config
                .book_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            min_pdf_size: config.min_pdf_size_bytes(),
            max_pdf_size: config.max_pdf_size_bytes(),
            min_book_size: config.min_book_size_bytes(),
            hosts: HostRegistry::default(),
        })
    }

    /// Replaces the file host registry
    pub fn with_hosts(mut self, hosts: HostRegistry) -> Self {
        self.hosts = hosts;
        self
    }

    pub fn variant(&self) -> ScoringVariant {
        self.variant
    }

    /// Whether the URL alone marks a PDF
    ///
    /// True for paths ending in `.pdf`, query strings matching a PDF
    /// pattern, and documents on registered file hosts. Share links on
    /// social sites never count.
    pub fn is_candidate(&self, url: &Url) -> bool {
        if is_social_host(url) {
            return false;
        }

        has_pdf_path(url)
            || url
                .query()
                .is_some_and(|query| self.query_patterns.iter().any(|p| p.is_match(query)))
            || self.hosts.is_file_host(url)
    }

    /// Whether probing the link can tell anything about it
    pub fn request_spec(&self, url: &Url) -> RequestSpec {
        self.hosts.prepare(url)
    }

    /// Classifies a link, returning a record for PDFs
    pub fn classify(
        &self,
        link: &PdfLink<'_>,
        probe: Option<&ProbeInfo>,
    ) -> Option<PdfDocumentRecord> {
        match self.evaluate(link, probe) {
            Ok(record) => Some(record),
            Err(rejection) => {
                tracing::trace!("Not recording {}: {:?}", link.url, rejection);
                None
            }
        }
    }

    /// Like [`classify`](Self::classify), but says why a link was rejected
    pub fn evaluate(
        &self,
        link: &PdfLink<'_>,
        probe: Option<&ProbeInfo>,
    ) -> Result<PdfDocumentRecord, Rejection> {
        if is_social_host(link.url) {
            return Err(Rejection::SocialHost);
        }

        let file_host = self.hosts.is_file_host(link.url);
        let probed_pdf = probe.is_some_and(|p| p.is_success() && p.is_pdf());
        if !self.is_candidate(link.url) && !probed_pdf {
            return Err(Rejection::NotPdf);
        }

        // A PDF-looking query that actually serves a web page
        if let Some(p) = probe {
            if p.is_success()
                && p.content_type.is_some()
                && !p.is_pdf()
                && !has_pdf_path(link.url)
                && !file_host
            {
                return Err(Rejection::NotPdf);
            }
        }

        let size = probe
            .filter(|p| p.is_success())
            .and_then(|p| p.content_length);

        if self.variant == ScoringVariant::Site {
            if let Some(size) = size {
                if size < self.min_pdf_size {
                    return Err(Rejection::TooSmall { size });
                }
                if size > self.max_pdf_size {
                    return Err(Rejection::TooLarge { size });
                }
            }
        }

        let (http_status, content_type, last_modified) = match probe {
            Some(p) => (Some(p.status), p.content_type.clone(), p.last_modified.clone()),
            None if file_host => (
                Some(200),
                Some(EXTERNAL_SERVICE_CONTENT_TYPE.to_string()),
                None,
            ),
            None => (None, None, None),
        };

        let filename = filename_from_url(link.url);
        let stem = file_stem(&filename);

        let author = extract_author(stem).or_else(|| extract_author(link.link_text));
        let title_source = author
            .as_ref()
            .and_then(|found| found.title.as_deref())
            .unwrap_or(stem);
        let title = extract_title(title_source, link.link_text);

        let isbn = extract_isbn(stem).or_else(|| extract_isbn(link.url.path()));
        let publication_year = extract_year(stem, Utc::now().year());

        let spaced_name = metadata::separators_to_spaces(stem);
        let text = link.link_text.to_lowercase();
        let signals = ScoreSignals {
            book_pattern_in_name: self.book_patterns.iter().any(|p| p.is_match(&spaced_name)),
            book_keyword_in_text: self.book_keywords.iter().any(|k| text.contains(k.as_str())),
            has_author: author.is_some(),
            has_isbn: isbn.is_some(),
            has_year: publication_year.is_some(),
            size,
        };
        let min_book_size = match self.variant {
            ScoringVariant::Book => Some(self.min_book_size),
            ScoringVariant::Site => None,
        };

        Ok(PdfDocumentRecord {
            url: link.url.to_string(),
            title,
            author: author.map(|found| found.author),
            isbn,
            publication_year,
            file_size_bytes: size,
            content_type,
            last_modified,
            discovered_on_page: link.discovered_on_page.to_string(),
            discovery_timestamp: Utc::now(),
            http_status,
            depth: link.depth,
            link_text: link.link_text.to_string(),
            link_context: link.link_context.to_string(),
            domain: extract_domain(link.url).unwrap_or_default(),
            confidence_score: confidence(&signals, min_book_size),
        })
    }
}

/// True for share links on social networks
pub fn is_social_host(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    SOCIAL_HOSTS
        .iter()
        .any(|social| host == *social || host.ends_with(&format!(".{}", social)))
}

fn has_pdf_path(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    path.ends_with(".pdf") || path.ends_with(".pdf/")
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", p, e)))
        })
        .collect()
}
