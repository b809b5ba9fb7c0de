//! Result store
//!
//! Holds discovered PDF records keyed by canonical URL. The first record for
//! a URL wins; later discoveries of the same document are dropped.

use crate::classifier::PdfDocumentRecord;
use crate::output::stats::CrawlStats;
use crate::output::summary::{CrawlSummary, DocumentBrief, SizeBuckets};
use crate::url::canonical_key;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Number of records in the confidence leaderboard
const TOP_CONFIDENCE: usize = 5;

/// Discovered PDF records in discovery order
#[derive(Debug, Default)]
pub struct ResultStore {
    records: Vec<PdfDocumentRecord>,
    keys: HashSet<String>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record unless its canonical URL is already present
    ///
    /// Returns true if the record was stored.
    pub fn add(&mut self, record: PdfDocumentRecord) -> bool {
        if !self.keys.insert(canonical_key(&record.url)) {
            tracing::debug!("Already recorded {}", record.url);
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.keys.contains(&canonical_key(url))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PdfDocumentRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<PdfDocumentRecord> {
        self.records
    }

    /// Builds the end-of-crawl summary
    ///
    /// # Arguments
    ///
    /// * `stats` - Traversal counters of the crawl that produced the records
    /// * `top_k` - Length of the size and recency leaderboards
    /// * `interrupted` - Whether the crawl was cancelled
    pub fn summary(&self, stats: &CrawlStats, top_k: usize, interrupted: bool) -> CrawlSummary {
        let mut size_buckets = SizeBuckets::default();
        let mut pdfs_by_domain: HashMap<&str, usize> = HashMap::new();
        let mut total_size_bytes = 0u64;
        let mut sized = 0usize;

        for record in &self.records {
            size_buckets.add(record.file_size_bytes);
            *pdfs_by_domain.entry(record.domain.as_str()).or_insert(0) += 1;
            if let Some(size) = record.file_size_bytes {
                total_size_bytes += size;
                sized += 1;
            }
        }

        let mut pdfs_by_domain: Vec<(String, usize)> = pdfs_by_domain
            .into_iter()
            .map(|(domain, count)| (domain.to_string(), count))
            .collect();
        pdfs_by_domain.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let average_confidence = if self.records.is_empty() {
            0.0
        } else {
            self.records.iter().map(|r| r.confidence_score).sum::<f64>()
                / self.records.len() as f64
        };

        let mut largest: Vec<&PdfDocumentRecord> = self
            .records
            .iter()
            .filter(|r| r.file_size_bytes.is_some())
            .collect();
        largest.sort_by(|a, b| b.file_size_bytes.cmp(&a.file_size_bytes));

        let mut most_recent: Vec<&PdfDocumentRecord> = self.records.iter().collect();
        most_recent.sort_by(|a, b| b.discovery_timestamp.cmp(&a.discovery_timestamp));

        let mut top_confidence: Vec<&PdfDocumentRecord> = self.records.iter().collect();
        top_confidence.sort_by(|a, b| {
            b.confidence_score
                .partial_cmp(&a.confidence_score)
                .unwrap_or(Ordering::Equal)
        });

        let domains: HashSet<&str> = stats
            .domains_seen
            .keys()
            .map(String::as_str)
            .chain(self.records.iter().map(|r| r.domain.as_str()))
            .collect();

        CrawlSummary {
            started_at: stats.start_time,
            finished_at: stats.end_time,
            elapsed_seconds: stats.elapsed_seconds(),
            interrupted,
            pages_crawled: stats.pages_crawled,
            pages_per_second: stats.pages_per_second(),
            errors_count: stats.errors_count,
            duplicate_urls_skipped: stats.duplicate_urls_skipped,
            external_urls_skipped: stats.external_urls_skipped,
            robots_blocked_urls: stats.robots_blocked_urls,
            unique_domains: domains.len(),
            failed_urls: stats.failed_urls.clone(),
            total_pdfs: self.records.len(),
            total_size_bytes,
            average_size_bytes: (sized > 0).then(|| total_size_bytes as f64 / sized as f64),
            average_confidence,
            pdfs_with_authors: self.records.iter().filter(|r| r.author.is_some()).count(),
            pdfs_with_isbn: self.records.iter().filter(|r| r.isbn.is_some()).count(),
            size_buckets,
            pdfs_by_domain,
            largest: briefs(&largest, top_k),
            most_recent: briefs(&most_recent, top_k),
            top_confidence: briefs(&top_confidence, TOP_CONFIDENCE),
        }
    }
}

fn briefs(records: &[&PdfDocumentRecord], limit: usize) -> Vec<DocumentBrief> {
    records
        .iter()
        .take(limit)
        .map(|record| DocumentBrief::from(*record))
        .collect()
}
