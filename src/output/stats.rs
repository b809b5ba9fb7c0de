//! Crawl statistics
//!
//! [`CrawlStats`] is owned and updated by the coordinator while the crawl
//! runs; everything else only reads a finished snapshot.

use crate::output::summary::CrawlSummary;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A page that could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUrl {
    pub url: String,
    pub reason: String,
}

/// Counters collected during one crawl
#[derive(Debug, Clone)]
pub struct CrawlStats {
    /// Pages fetched successfully
    pub pages_crawled: u32,

    /// Page fetches that failed
    pub errors_count: u32,

    /// Records added to the result store
    pub pdfs_found: u32,

    /// Links dropped because they were already enqueued or fetched
    pub duplicate_urls_skipped: u32,

    /// Links dropped because they lead off-site
    pub external_urls_skipped: u32,

    /// URLs robots.txt did not allow
    pub robots_blocked_urls: u32,

    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,

    /// Pages fetched per domain
    pub domains_seen: HashMap<String, u32>,

    pub failed_urls: Vec<FailedUrl>,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self {
            pages_crawled: 0,
            errors_count: 0,
            pdfs_found: 0,
            duplicate_urls_skipped: 0,
            external_urls_skipped: 0,
            robots_blocked_urls: 0,
            start_time: Utc::now(),
            end_time: None,
            domains_seen: HashMap::new(),
            failed_urls: Vec::new(),
        }
    }

    /// Counts a successfully fetched page
    pub fn record_page(&mut self, domain: &str) {
        self.pages_crawled += 1;
        *self.domains_seen.entry(domain.to_string()).or_insert(0) += 1;
    }

    /// Counts a failed page and remembers why it failed
    pub fn record_failure(&mut self, url: &str, reason: impl Into<String>) {
        self.errors_count += 1;
        self.failed_urls.push(FailedUrl {
            url: url.to_string(),
            reason: reason.into(),
        });
    }

    /// Stamps the end time; later calls keep the first stamp
    pub fn finish(&mut self) {
        if self.end_time.is_none() {
            self.end_time = Some(Utc::now());
        }
    }

    /// Seconds between start and end (or now, while running)
    pub fn elapsed_seconds(&self) -> f64 {
        let end = self.end_time.unwrap_or_else(Utc::now);
        let millis = (end - self.start_time).num_milliseconds().max(0);
        millis as f64 / 1000.0
    }

    pub fn pages_per_second(&self) -> f64 {
        let elapsed = self.elapsed_seconds();
        if elapsed > 0.0 {
            self.pages_crawled as f64 / elapsed
        } else {
            0.0
        }
    }
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints a crawl summary to stdout in a formatted manner
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    if summary.interrupted {
        println!("(interrupted - partial results)\n");
    }

    println!("Overview:");
    println!("  Pages crawled: {}", summary.pages_crawled);
    println!("  PDFs found: {}", summary.total_pdfs);
    println!("  Errors: {}", summary.errors_count);
    println!(
        "  Duration: {:.1}s ({:.2} pages/s)",
        summary.elapsed_seconds, summary.pages_per_second
    );
    println!(
        "  Skipped: {} duplicate, {} external, {} blocked by robots.txt",
        summary.duplicate_urls_skipped, summary.external_urls_skipped, summary.robots_blocked_urls
    );
    println!();

    if summary.total_pdfs == 0 {
        return;
    }

    println!("Documents:");
    println!(
        "  Total size: {:.2} MB",
        summary.total_size_bytes as f64 / (1024.0 * 1024.0)
    );
    if let Some(average) = summary.average_size_bytes {
        println!("  Average size: {:.2} MB", average / (1024.0 * 1024.0));
    }
    println!(
        "  Sizes: {} small, {} medium, {} large, {} unknown",
        summary.size_buckets.small,
        summary.size_buckets.medium,
        summary.size_buckets.large,
        summary.size_buckets.unknown
    );
    println!("  Average confidence: {:.2}", summary.average_confidence);
    println!(
        "  With author: {}, with ISBN: {}",
        summary.pdfs_with_authors, summary.pdfs_with_isbn
    );
    println!();

    println!("PDFs by Domain:");
    for (domain, count) in &summary.pdfs_by_domain {
        println!("  {}: {}", domain, count);
    }
    println!();

    if !summary.largest.is_empty() {
        println!("Largest PDFs:");
        for brief in &summary.largest {
            println!(
                "  {:>8.2} MB  {}",
                brief.file_size_bytes.unwrap_or(0) as f64 / (1024.0 * 1024.0),
                brief.label()
            );
        }
        println!();
    }

    if !summary.top_confidence.is_empty() {
        println!("Highest Confidence:");
        for brief in &summary.top_confidence {
            println!("  {:.2}  {}", brief.confidence_score, brief.label());
        }
        println!();
    }

    if !summary.failed_urls.is_empty() {
        println!("Failed URLs ({}):", summary.failed_urls.len());
        for failed in summary.failed_urls.iter().take(20) {
            println!("  - {} ({})", failed.url, failed.reason);
        }
        println!();
    }
}
