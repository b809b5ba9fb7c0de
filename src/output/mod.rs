//! Output module for crawl results
//!
//! This module handles:
//! - Storing discovered PDF records, first discovery wins
//! - Recording crawl statistics and building the end-of-crawl summary
//! - Exporting CSV catalogs, the sitemap URL list and a markdown report

mod csv_export;
mod markdown;
pub mod stats;
mod store;
mod summary;

pub use csv_export::{
    export_book_csv, export_site_csv, write_book_csv, write_site_csv, write_sitemap_urls,
    BOOK_HEADERS, SITE_HEADERS,
};
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{print_summary, CrawlStats, FailedUrl};
pub use store::ResultStore;
pub use summary::{CrawlSummary, DocumentBrief, OutputError, OutputResult, SizeBuckets};
