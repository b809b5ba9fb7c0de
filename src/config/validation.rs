use crate::config::types::{Config, CrawlerConfig, OutputConfig, PdfConfig, UserAgentConfig};
use crate::ConfigError;
use regex::Regex;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_pdf_config(&config.pdf)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates a seed URL given on the command line
pub fn validate_seed_url(seed: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' must use http or https",
            seed
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' has no host",
            seed
        )));
    }

    Ok(url)
}

/// Longest per-host wait that may be configured (one hour)
const MAX_CRAWL_DELAY_CEILING: f64 = 3600.0;

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages_per_site < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages-per-site must be >= 1, got {}",
            config.max_pages_per_site
        )));
    }

    if !config.request_delay_seconds.is_finite() || config.request_delay_seconds < 0.0 {
        return Err(ConfigError::Validation(format!(
            "request-delay-seconds must be a non-negative number, got {}",
            config.request_delay_seconds
        )));
    }

    if !(0.0..=MAX_CRAWL_DELAY_CEILING).contains(&config.max_crawl_delay_seconds) {
        return Err(ConfigError::Validation(format!(
            "max-crawl-delay-seconds must be between 0 and {}, got {}",
            MAX_CRAWL_DELAY_CEILING, config.max_crawl_delay_seconds
        )));
    }

    if config.request_delay_seconds > config.max_crawl_delay_seconds {
        return Err(ConfigError::Validation(format!(
            "request-delay-seconds ({}) exceeds max-crawl-delay-seconds ({})",
            config.request_delay_seconds, config.max_crawl_delay_seconds
        )));
    }

    if config.request_timeout_seconds < 1 {
        return Err(ConfigError::Validation(
            "request-timeout-seconds must be >= 1".to_string(),
        ));
    }

    if config.max_page_bytes == 0 {
        return Err(ConfigError::Validation(
            "max-page-bytes must be > 0".to_string(),
        ));
    }

    if let Some(selector) = &config.link_scope_selector {
        scraper::Selector::parse(selector).map_err(|e| {
            ConfigError::InvalidPattern(format!(
                "Invalid link-scope-selector '{}': {:?}",
                selector, e
            ))
        })?;
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-version cannot be empty".to_string(),
        ));
    }

    if !config.contact_url.is_empty() {
        Url::parse(&config.contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

/// Validates PDF thresholds and patterns
fn validate_pdf_config(config: &PdfConfig) -> Result<(), ConfigError> {
    if config.max_pdf_size_mb == 0 {
        return Err(ConfigError::Validation(
            "max-pdf-size-mb must be > 0".to_string(),
        ));
    }

    if config.min_pdf_size_bytes() > config.max_pdf_size_bytes() {
        return Err(ConfigError::Validation(format!(
            "min-pdf-size-kb ({} KB) exceeds max-pdf-size-mb ({} MB)",
            config.min_pdf_size_kb, config.max_pdf_size_mb
        )));
    }

    if !config.min_book_size_mb.is_finite() || config.min_book_size_mb < 0.0 {
        return Err(ConfigError::Validation(format!(
            "min-book-size-mb must be a non-negative number, got {}",
            config.min_book_size_mb
        )));
    }

    for pattern in config
        .book_patterns
        .iter()
        .chain(config.pdf_query_patterns.iter())
    {
        Regex::new(pattern).map_err(|e| {
            ConfigError::InvalidPattern(format!("Invalid regex '{}': {}", pattern, e))
        })?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.is_empty() || config.book_csv_path.is_empty() {
        return Err(ConfigError::Validation(
            "CSV output paths cannot be empty".to_string(),
        ));
    }

    if config.sitemap_urls_path.is_empty() {
        return Err(ConfigError::Validation(
            "sitemap-urls-path cannot be empty".to_string(),
        ));
    }

    if !(0.0..=1.0).contains(&config.min_confidence) {
        return Err(ConfigError::Validation(format!(
            "min-confidence must be between 0 and 1, got {}",
            config.min_confidence
        )));
    }

    if config.top_k == 0 {
        return Err(ConfigError::Validation("top-k must be >= 1".to_string()));
    }

    Ok(())
}
