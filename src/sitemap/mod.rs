//! Sitemap seeding
//!
//! This module handles:
//! - Locating a site's sitemaps (`/sitemap.xml`, robots.txt `Sitemap:` lines, `/sitemap.txt`)
//! - Expanding a sitemap index into its child sitemaps, one level deep
//! - Yielding the listed page URLs lazily, one at a time
//!
//! A sitemap that cannot be fetched or parsed contributes nothing; discovery
//! itself never fails. Duplicate URLs are left for the caller to filter.

mod parser;

pub use parser::{looks_like_xml, parse_text_sitemap, parse_xml_sitemap, ParsedSitemap};

use crate::crawler::HttpClient;
use crate::robots::{fetch_robots, ParsedRobots};
use crate::url::host_key;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Upper bound on sitemap documents fetched for one site
pub const MAX_SITEMAPS: usize = 50;

/// Where discovery looks next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    SitemapXml,
    RobotsDirectives,
    SitemapTxt,
    Done,
}

#[derive(Debug, Clone)]
struct SitemapJob {
    url: String,
    /// Child sitemaps of an index are followed only for top-level documents
    expand_index: bool,
}

/// Creates [`SitemapDiscovery`] sequences for sites
pub struct SitemapSeeder {
    client: Arc<dyn HttpClient>,
    timeout: Duration,
    request_delay: Duration,
    max_sitemaps: usize,
}

impl SitemapSeeder {
    pub fn new(client: Arc<dyn HttpClient>, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            request_delay: Duration::ZERO,
            max_sitemaps: MAX_SITEMAPS,
        }
    }

    /// Pause between consecutive sitemap requests
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_max_sitemaps(mut self, max_sitemaps: usize) -> Self {
        self.max_sitemaps = max_sitemaps;
        self
    }

    /// Starts discovery for the site `base_url` belongs to
    ///
    /// Nothing is fetched until the first call to
    /// [`SitemapDiscovery::next_url`].
    pub fn discover(&self, base_url: &Url) -> SitemapDiscovery {
        SitemapDiscovery {
            client: Arc::clone(&self.client),
            timeout: self.timeout,
            request_delay: self.request_delay,
            max_sitemaps: self.max_sitemaps,
            origin: host_key(base_url),
            robots: None,
            stage: Stage::SitemapXml,
            jobs: VecDeque::new(),
            buffer: VecDeque::new(),
            seen_sitemaps: HashSet::new(),
            sources: Vec::new(),
            fetches: 0,
            yielded: 0,
        }
    }
}

/// Lazy, finite sequence of URLs listed in a site's sitemaps
///
/// Once exhausted it stays exhausted.
pub struct SitemapDiscovery {
    client: Arc<dyn HttpClient>,
    timeout: Duration,
    request_delay: Duration,
    max_sitemaps: usize,
    origin: String,
    robots: Option<ParsedRobots>,
    stage: Stage,
    jobs: VecDeque<SitemapJob>,
    buffer: VecDeque<String>,
    seen_sitemaps: HashSet<String>,
    sources: Vec<String>,
    fetches: usize,
    yielded: usize,
}

impl SitemapDiscovery {
    /// Reuses an already fetched robots.txt instead of requesting it again
    pub fn with_robots(mut self, robots: Option<ParsedRobots>) -> Self {
        self.robots = robots;
        self
    }

    /// Returns the next listed URL, or None once every source is exhausted
    pub async fn next_url(&mut self) -> Option<String> {
        loop {
            if let Some(url) = self.buffer.pop_front() {
                self.yielded += 1;
                return Some(url);
            }

            if let Some(job) = self.jobs.pop_front() {
                self.process(job).await;
                continue;
            }

            // Later sources are only consulted while nothing has been found
            if self.yielded > 0 {
                self.stage = Stage::Done;
            }

            match self.stage {
                Stage::SitemapXml => {
                    self.stage = Stage::RobotsDirectives;
                    let url = format!("{}/sitemap.xml", self.origin);
                    self.schedule(url, true);
                }
                Stage::RobotsDirectives => {
                    self.stage = Stage::SitemapTxt;
                    for url in self.robots_sitemaps().await {
                        self.schedule(url, true);
                    }
                }
                Stage::SitemapTxt => {
                    self.stage = Stage::Done;
                    let url = format!("{}/sitemap.txt", self.origin);
                    self.schedule(url, false);
                }
                Stage::Done => return None,
            }
        }
    }

    /// Drains the whole sequence
    pub async fn collect_all(mut self) -> Vec<String> {
        let mut urls = Vec::new();
        while let Some(url) = self.next_url().await {
            urls.push(url);
        }
        urls
    }

    /// Sitemap documents that were fetched successfully
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Number of HTTP requests made so far
    pub fn requests_made(&self) -> usize {
        self.fetches
    }

    fn schedule(&mut self, url: String, expand_index: bool) {
        if self.seen_sitemaps.insert(url.clone()) {
            self.jobs.push_back(SitemapJob { url, expand_index });
        }
    }

    async fn robots_sitemaps(&mut self) -> Vec<String> {
        if self.robots.is_none() {
            self.pause().await;
            self.fetches += 1;
            self.robots = Some(fetch_robots(self.client.as_ref(), &self.origin, self.timeout).await);
        }

        self.robots
            .as_ref()
            .map(|robots| robots.sitemaps().to_vec())
            .unwrap_or_default()
    }

    async fn process(&mut self, job: SitemapJob) {
        if self.sources.len() >= self.max_sitemaps {
            tracing::debug!("Sitemap limit reached, skipping {}", job.url);
            return;
        }

        let Some(body) = self.fetch(&job.url).await else {
            return;
        };
        self.sources.push(job.url.clone());

        if !looks_like_xml(&body) {
            let urls = parse_text_sitemap(&String::from_utf8_lossy(&body));
            tracing::debug!("Text sitemap {} lists {} URLs", job.url, urls.len());
            self.buffer.extend(urls);
            return;
        }

        let parsed = parse_xml_sitemap(&body);
        if parsed.is_index() {
            if job.expand_index {
                tracing::debug!(
                    "Sitemap index {} lists {} child sitemaps",
                    job.url,
                    parsed.child_sitemaps.len()
                );
                for child in parsed.child_sitemaps {
                    self.schedule(child, false);
                }
            } else {
                tracing::debug!("Not expanding nested sitemap index {}", job.url);
            }
        }

        tracing::debug!("Sitemap {} lists {} URLs", job.url, parsed.urls.len());
        self.buffer.extend(parsed.urls);
    }

    async fn fetch(&mut self, url: &str) -> Option<Vec<u8>> {
        self.pause().await;
        self.fetches += 1;

        match self.client.get(url, &[], self.timeout).await {
            Ok(response) if response.is_success() => Some(response.body),
            Ok(response) => {
                tracing::debug!("Sitemap {} returned HTTP {}", url, response.status);
                None
            }
            Err(e) => {
                tracing::debug!("Failed to fetch sitemap {}: {}", url, e);
                None
            }
        }
    }

    async fn pause(&self) {
        if self.fetches > 0 && !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
    }
}
