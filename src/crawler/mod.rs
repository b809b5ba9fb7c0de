//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The HTTP client abstraction and its reqwest implementation
//! - HTML link extraction
//! - The breadth-first frontier and the politeness gate
//! - Overall crawl coordination and cooperative cancellation

mod coordinator;
mod fetcher;
mod frontier;
mod http;
mod parser;
mod politeness;

pub use coordinator::{Coordinator, CrawlOutcome};
pub use fetcher::{
    fetch_page, probe_link, ContentKind, ExtractedLink, FetchOptions, PageResult, ProbeInfo,
};
pub use frontier::{EnqueueRejection, Frontier, FrontierEntry, VisitedSet};
pub use http::{
    build_http_client, HttpClient, HttpRequest, HttpResponse, Method, ReqwestHttpClient,
    TransportError,
};
pub use parser::{LinkExtractor, RawLink, ScraperLinkExtractor};
pub use politeness::PolitenessGate;

use crate::config::Config;
use crate::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag
///
/// Clones share one flag. The coordinator checks it before every frontier
/// pop and stops with its results intact once it is set.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal(Arc<AtomicBool>);

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs a complete crawl over the network
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the reqwest-backed HTTP client
/// 2. Check the seed URL is reachable
/// 3. Seed the frontier from the seed and the site's sitemaps
/// 4. Traverse the site and classify every PDF link found
///
/// # Arguments
///
/// * `config` - Validated crawler configuration
/// * `seed` - URL the crawl starts from
/// * `shutdown` - Signal that ends the crawl early when triggered
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl finished or was interrupted
/// * `Err(ScoutError)` - Invalid seed, unreachable seed or client setup failure
pub async fn crawl(config: Config, seed: &str, shutdown: ShutdownSignal) -> Result<CrawlOutcome> {
    let client = ReqwestHttpClient::from_config(&config.user_agent, config.crawler.max_page_bytes)?;
    Coordinator::new(Arc::new(config), seed, Arc::new(client))?
        .with_shutdown(shutdown)
        .run()
        .await
}
