//! pdf-scout: a polite PDF discovery crawler
//!
//! This crate walks a website breadth-first from a seed URL, respecting
//! robots.txt and per-host rate limits, and catalogs every PDF document it
//! finds together with heuristic metadata (title, author, ISBN, year, size)
//! and a confidence score estimating whether the document is a book.

pub mod classifier;
pub mod config;
pub mod crawler;
pub mod hosts;
pub mod output;
pub mod robots;
pub mod sitemap;
pub mod state;
pub mod url;

#[cfg(test)]
pub(crate) mod testing;

use thiserror::Error;

/// Main error type for pdf-scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid crawl phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// All of these are fatal at crawl start.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Seed URL {url} is unreachable: {reason}")]
    UnreachableSeed { url: String, reason: String },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Why a single page fetch failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The request did not complete within the configured timeout
    Timeout,
    /// Connection refused, DNS failure, TLS failure and similar
    Connection(String),
    /// The server answered with a status >= 400
    HttpStatus(u16),
    /// The body exceeded the configured size limit
    ContentTooLarge { limit: usize },
    /// The URL could not be requested at all
    MalformedUrl(String),
}

/// A failed page fetch
///
/// The crawl never retries on its own; callers decide what to do based on
/// [`FetchError::is_retryable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{url}: {}", describe_kind(.kind))]
pub struct FetchError {
    pub url: String,
    pub kind: FetchErrorKind,
}

fn describe_kind(kind: &FetchErrorKind) -> String {
    match kind {
        FetchErrorKind::Timeout => "request timed out".to_string(),
        FetchErrorKind::Connection(reason) => format!("connection error: {}", reason),
        FetchErrorKind::HttpStatus(code) => format!("HTTP status {}", code),
        FetchErrorKind::ContentTooLarge { limit } => {
            format!("content larger than {} bytes", limit)
        }
        FetchErrorKind::MalformedUrl(reason) => format!("malformed URL: {}", reason),
    }
}

impl FetchError {
    pub fn new(url: impl Into<String>, kind: FetchErrorKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }

    /// Timeouts, connection failures and 5xx responses may succeed later
    pub fn is_retryable(&self) -> bool {
        match &self.kind {
            FetchErrorKind::Timeout | FetchErrorKind::Connection(_) => true,
            FetchErrorKind::HttpStatus(code) => *code >= 500,
            FetchErrorKind::ContentTooLarge { .. } | FetchErrorKind::MalformedUrl(_) => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_retryable()
    }

    /// Short reason string used in reports
    pub fn reason(&self) -> String {
        describe_kind(&self.kind)
    }
}

/// Result type alias for pdf-scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use classifier::{PdfClassifier, PdfDocumentRecord, ScoringVariant};
pub use config::{Config, CrawlBudget};
pub use crawler::{crawl, Coordinator, CrawlOutcome, ShutdownSignal};
pub use output::{CrawlSummary, ResultStore};
pub use state::CrawlPhase;
pub use url::{canonicalize_url, extract_domain};
