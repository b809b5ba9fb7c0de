//! Output errors and the crawl summary

use crate::classifier::PdfDocumentRecord;
use crate::output::stats::FailedUrl;
use chrono::{DateTime, Utc};
use thiserror::Error;

const MB: u64 = 1024 * 1024;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// PDF counts by size class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeBuckets {
    /// Under 1 MB
    pub small: usize,
    /// 1 MB up to 10 MB
    pub medium: usize,
    /// 10 MB and above
    pub large: usize,
    /// Size never learned
    pub unknown: usize,
}

impl SizeBuckets {
    pub fn add(&mut self, size: Option<u64>) {
        match size {
            None => self.unknown += 1,
            Some(bytes) if bytes < MB => self.small += 1,
            Some(bytes) if bytes < 10 * MB => self.medium += 1,
            Some(_) => self.large += 1,
        }
    }
}

/// The few fields of a record shown in leaderboards
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentBrief {
    pub url: String,
    pub title: String,
    pub file_size_bytes: Option<u64>,
    pub confidence_score: f64,
    pub discovered_at: DateTime<Utc>,
}

impl DocumentBrief {
    /// Title, or the URL when the title is empty
    pub fn label(&self) -> &str {
        if self.title.is_empty() {
            &self.url
        } else {
            &self.title
        }
    }
}

impl From<&PdfDocumentRecord> for DocumentBrief {
    fn from(record: &PdfDocumentRecord) -> Self {
        Self {
            url: record.url.clone(),
            title: record.title.clone(),
            file_size_bytes: record.file_size_bytes,
            confidence_score: record.confidence_score,
            discovered_at: record.discovery_timestamp,
        }
    }
}

/// Summary statistics for a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    // Run information
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub elapsed_seconds: f64,
    pub interrupted: bool,

    // Traversal statistics
    pub pages_crawled: u32,
    pub pages_per_second: f64,
    pub errors_count: u32,
    pub duplicate_urls_skipped: u32,
    pub external_urls_skipped: u32,
    pub robots_blocked_urls: u32,
    pub unique_domains: usize,
    pub failed_urls: Vec<FailedUrl>,

    // Document statistics
    pub total_pdfs: usize,
    pub total_size_bytes: u64,
    /// Over PDFs of known size
    pub average_size_bytes: Option<f64>,
    pub average_confidence: f64,
    pub pdfs_with_authors: usize,
    pub pdfs_with_isbn: usize,
    pub size_buckets: SizeBuckets,

    /// Sorted by count, descending
    pub pdfs_by_domain: Vec<(String, usize)>,

    // Leaderboards
    pub largest: Vec<DocumentBrief>,
    pub most_recent: Vec<DocumentBrief>,
    pub top_confidence: Vec<DocumentBrief>,
}

impl CrawlSummary {
    /// Share of attempted pages that failed, as a percentage
    pub fn error_rate(&self) -> f64 {
        let attempted = self.pages_crawled + self.errors_count;
        if attempted == 0 {
            return 0.0;
        }
        (self.errors_count as f64 / attempted as f64) * 100.0
    }

    /// PDFs found per successfully crawled page
    pub fn pdfs_per_page(&self) -> f64 {
        if self.pages_crawled == 0 {
            return 0.0;
        }
        self.total_pdfs as f64 / self.pages_crawled as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_buckets() {
        let mut buckets = SizeBuckets::default();
        for size in [None, Some(10), Some(MB), Some(10 * MB - 1), Some(10 * MB)] {
            buckets.add(size);
        }
        assert_eq!(
            buckets,
            SizeBuckets {
                small: 1,
                medium: 2,
                large: 1,
                unknown: 1
            }
        );
    }

    #[test]
    fn test_brief_label_falls_back_to_url() {
        let brief = DocumentBrief {
            url: "https://example.edu/a.pdf".to_string(),
            title: String::new(),
            file_size_bytes: None,
            confidence_score: 0.0,
            discovered_at: Utc::now(),
        };
        assert_eq!(brief.label(), "https://example.edu/a.pdf");
    }
}
