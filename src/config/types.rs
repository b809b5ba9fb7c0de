use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for pdf-scout
///
/// Every section is optional in the TOML file; missing values fall back to
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub pdf: PdfConfig,
    pub output: OutputConfig,
}

/// Which catalog the crawl produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlMode {
    /// Every PDF on the site, hard size limits
    #[default]
    Site,
    /// Book-like PDFs, scored by confidence
    Book,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of pages fetched per crawl
    #[serde(rename = "max-pages-per-site")]
    pub max_pages_per_site: u32,

    /// Maximum link depth from the seed URL
    #[serde(rename = "max-crawl-depth")]
    pub max_crawl_depth: u32,

    /// Minimum delay between requests to the same host (seconds)
    #[serde(rename = "request-delay-seconds")]
    pub request_delay_seconds: f64,

    /// Upper bound on any wait between requests to one host, robots.txt
    /// crawl delays included (seconds)
    #[serde(rename = "max-crawl-delay-seconds")]
    pub max_crawl_delay_seconds: f64,

    /// Whether links leaving the seed's site are followed
    #[serde(rename = "follow-external-links")]
    pub follow_external_links: bool,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-seconds")]
    pub request_timeout_seconds: u64,

    /// Largest HTML body that will be parsed
    #[serde(rename = "max-page-bytes")]
    pub max_page_bytes: usize,

    /// Characters of surrounding text kept per link
    #[serde(rename = "link-context-chars")]
    pub link_context_chars: usize,

    /// Characters of anchor text kept per link
    #[serde(rename = "link-text-chars")]
    pub link_text_chars: usize,

    /// Seed the frontier from sitemaps
    #[serde(rename = "use-sitemaps")]
    pub use_sitemaps: bool,

    /// Honour robots.txt rules and crawl delays
    #[serde(rename = "respect-robots")]
    pub respect_robots: bool,

    /// Restrict link extraction to elements matching this CSS selector
    #[serde(rename = "link-scope-selector")]
    pub link_scope_selector: Option<String>,

    pub mode: CrawlMode,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages_per_site: 100,
            max_crawl_depth: 3,
            request_delay_seconds: 1.0,
            max_crawl_delay_seconds: 30.0,
            follow_external_links: false,
            request_timeout_seconds: 30,
            max_page_bytes: 10 * 1024 * 1024,
            link_context_chars: 500,
            link_text_chars: 200,
            use_sitemaps: true,
            respect_robots: true,
            link_scope_selector: None,
            mode: CrawlMode::Site,
        }
    }
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "PdfScout".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: String::new(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+contact)`
    pub fn header_value(&self) -> String {
        if self.contact_url.is_empty() {
            format!("{}/{}", self.crawler_name, self.crawler_version)
        } else {
            format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, self.contact_url
            )
        }
    }
}

/// PDF detection and scoring configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Smallest PDF kept by a site crawl (KB)
    #[serde(rename = "min-pdf-size-kb")]
    pub min_pdf_size_kb: u64,

    /// Largest PDF kept by a site crawl (MB)
    #[serde(rename = "max-pdf-size-mb")]
    pub max_pdf_size_mb: u64,

    /// Size at which a PDF counts as book-sized (MB)
    #[serde(rename = "min-book-size-mb")]
    pub min_book_size_mb: f64,

    /// Regexes matched against the file name that suggest a book
    #[serde(rename = "book-patterns")]
    pub book_patterns: Vec<String>,

    /// Regexes matched against the query string that mark a PDF link
    #[serde(rename = "pdf-query-patterns")]
    pub pdf_query_patterns: Vec<String>,

    /// Words in link text that suggest a book
    #[serde(rename = "book-keywords")]
    pub book_keywords: Vec<String>,

    /// Issue HEAD requests for PDF links to learn size and type
    #[serde(rename = "probe-pdf-links")]
    pub probe_pdf_links: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            min_pdf_size_kb: 10,
            max_pdf_size_mb: 500,
            min_book_size_mb: 1.0,
            book_patterns: vec![
                r"(?i)\b(book|ebook|e-book|textbook|handbook|manual|guide)\b".to_string(),
                r"(?i)(edition|\bed\b|volume|vol\.?\s*\d)".to_string(),
                r"(?i)(isbn|chapter)".to_string(),
            ],
            pdf_query_patterns: vec![
                r"(?i)(^|&)(format|type|ext|filetype)=pdf(&|$)".to_string(),
                r"(?i)\.pdf(&|$)".to_string(),
            ],
            book_keywords: ["book", "ebook", "manual", "guide", "tutorial", "textbook"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            probe_pdf_links: true,
        }
    }
}

impl PdfConfig {
    pub fn min_pdf_size_bytes(&self) -> u64 {
        self.min_pdf_size_kb * 1024
    }

    pub fn max_pdf_size_bytes(&self) -> u64 {
        self.max_pdf_size_mb * 1024 * 1024
    }

    pub fn min_book_size_bytes(&self) -> u64 {
        (self.min_book_size_mb * 1024.0 * 1024.0) as u64
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// CSV written by a site crawl
    #[serde(rename = "csv-path")]
    pub csv_path: String,

    /// CSV written by a book crawl
    #[serde(rename = "book-csv-path")]
    pub book_csv_path: String,

    /// Text file listing every URL found in sitemaps
    #[serde(rename = "sitemap-urls-path")]
    pub sitemap_urls_path: String,

    /// Optional markdown report
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,

    /// Length of the size leaderboard
    #[serde(rename = "top-k")]
    pub top_k: usize,

    /// Book records below this score are left out of the export
    #[serde(rename = "min-confidence")]
    pub min_confidence: f64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: "pdf_documents.csv".to_string(),
            book_csv_path: "pdf_books.csv".to_string(),
            sitemap_urls_path: "sitemap_urls.txt".to_string(),
            summary_path: None,
            top_k: 10,
            min_confidence: 0.0,
        }
    }
}

/// The traversal limits of one crawl
///
/// Built once from the configuration and never changed while the crawl runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrawlBudget {
    pub max_pages: u32,
    pub max_depth: u32,
    pub request_delay: Duration,
    pub max_crawl_delay: Duration,
    pub follow_external: bool,
}

impl CrawlBudget {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        let max_crawl_delay = bounded_seconds(config.max_crawl_delay_seconds, Duration::MAX);
        Self {
            max_pages: config.max_pages_per_site,
            max_depth: config.max_crawl_depth,
            request_delay: bounded_seconds(config.request_delay_seconds, max_crawl_delay),
            max_crawl_delay,
            follow_external: config.follow_external_links,
        }
    }
}

/// Converts seconds to a `Duration` no longer than `ceiling`
///
/// Negative and NaN values give zero; values too large for a `Duration`
/// give `ceiling`.
pub fn bounded_seconds(seconds: f64, ceiling: Duration) -> Duration {
    if seconds.is_nan() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(seconds).map_or(ceiling, |delay| delay.min(ceiling))
}
