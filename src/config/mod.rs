//! Configuration module for pdf-scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use pdf_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("pdf-scout.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_crawl_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    bounded_seconds, Config, CrawlBudget, CrawlMode, CrawlerConfig, OutputConfig, PdfConfig, UserAgentConfig,
};

// Re-export parser and validation functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_seed_url};
