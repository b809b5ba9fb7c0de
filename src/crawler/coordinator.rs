//! Crawl coordinator
//!
//! This module drives one crawl from seed to report:
//! - Seeding the frontier with the seed URL and sitemap-listed URLs
//! - Breadth-first traversal under the page and depth budgets
//! - Routing extracted links to the classifier or back into the frontier
//! - Stopping cleanly on budget exhaustion, an empty frontier or cancellation

use crate::classifier::{PdfClassifier, PdfLink};
use crate::config::{validate_seed_url, Config, CrawlBudget};
use crate::crawler::fetcher::{
    fetch_page, probe_link, ContentKind, FetchOptions, PageResult, ProbeInfo,
};
use crate::crawler::frontier::{EnqueueRejection, Frontier, FrontierEntry};
use crate::crawler::http::HttpClient;
use crate::crawler::parser::{LinkExtractor, ScraperLinkExtractor};
use crate::crawler::politeness::PolitenessGate;
use crate::crawler::ShutdownSignal;
use crate::hosts::RequestSpec;
use crate::output::{CrawlStats, ResultStore};
use crate::sitemap::SitemapSeeder;
use crate::state::CrawlPhase;
use crate::url::{canonicalize_url, extract_domain, follow_decision, host_key, FollowDecision};
use crate::{ConfigError, Result, ScoutError};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Pages between two progress log lines
const PROGRESS_INTERVAL: u32 = 10;

/// Everything a finished crawl produced
#[derive(Debug)]
pub struct CrawlOutcome {
    pub store: ResultStore,
    pub stats: CrawlStats,
    /// Every URL listed in the site's sitemaps, in discovery order
    pub sitemap_urls: Vec<String>,
    /// The crawl was cancelled before its frontier ran out
    pub interrupted: bool,
}

/// The Frontier Controller
///
/// Owns the frontier, the statistics and the result store for one crawl.
/// A coordinator is consumed by [`run`](Self::run) and cannot be restarted.
pub struct Coordinator {
    config: Arc<Config>,
    budget: CrawlBudget,
    seed: Url,
    client: Arc<dyn HttpClient>,
    extractor: Arc<dyn LinkExtractor>,
    classifier: PdfClassifier,
    gate: PolitenessGate,
    frontier: Frontier,
    store: ResultStore,
    stats: CrawlStats,
    phase: CrawlPhase,
    shutdown: ShutdownSignal,
    fetch_options: FetchOptions,
    /// PDF candidates already classified, so each is probed once
    seen_pdfs: HashSet<String>,
    /// Links outside the crawl already checked for PDF content
    inspected: HashSet<String>,
    sitemap_urls: Vec<String>,
    pages_attempted: u32,
    interrupted: bool,
}

impl Coordinator {
    /// Creates a coordinator for one crawl
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration
    /// * `seed` - URL the crawl starts from
    /// * `client` - Transport used for every request
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` for a seed that is not an absolute
    /// http(s) URL and `ConfigError::InvalidPattern` for a PDF pattern that
    /// does not compile.
    pub fn new(config: Arc<Config>, seed: &str, client: Arc<dyn HttpClient>) -> Result<Self> {
        let seed = canonicalize_url(validate_seed_url(seed)?.as_str())?;
        let budget = CrawlBudget::from_config(&config.crawler);
        let classifier = PdfClassifier::new(&config.pdf, config.crawler.mode.into())?;

        let gate = PolitenessGate::new(
            config.user_agent.header_value(),
            budget.request_delay,
            config.crawler.request_timeout(),
            config.crawler.respect_robots,
        )
        .with_max_crawl_delay(budget.max_crawl_delay);

        let extractor: Arc<dyn LinkExtractor> = Arc::new(ScraperLinkExtractor::new(
            config.crawler.link_text_chars,
            config.crawler.link_context_chars,
        ));

        let fetch_options = FetchOptions {
            timeout: config.crawler.request_timeout(),
            max_page_bytes: config.crawler.max_page_bytes,
            scope_selector: config.crawler.link_scope_selector.clone(),
        };

        Ok(Self {
            budget,
            seed,
            client,
            extractor,
            classifier,
            gate,
            frontier: Frontier::new(budget.max_depth),
            store: ResultStore::new(),
            stats: CrawlStats::new(),
            phase: CrawlPhase::Idle,
            shutdown: ShutdownSignal::new(),
            fetch_options,
            seen_pdfs: HashSet::new(),
            inspected: HashSet::new(),
            sitemap_urls: Vec::new(),
            pages_attempted: 0,
            interrupted: false,
            config,
        })
    }

    /// Replaces the HTML link extractor
    pub fn with_extractor(mut self, extractor: Arc<dyn LinkExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Uses an externally owned cancellation signal
    pub fn with_shutdown(mut self, shutdown: ShutdownSignal) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Runs the crawl to completion
    ///
    /// # Crawl Flow
    ///
    /// 1. Check that the seed host answers at all
    /// 2. Seed the frontier with the seed URL, then sitemap URLs
    /// 3. Traverse breadth-first until the page budget is spent, the
    ///    frontier is empty or the shutdown signal fires
    /// 4. Drop whatever is still queued and hand back the results
    ///
    /// A failing page never aborts the crawl. Cancellation is not an
    /// error either; the outcome is then flagged as interrupted.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnreachableSeed` when the seed host cannot be
    /// contacted.
    pub async fn run(mut self) -> Result<CrawlOutcome> {
        let start_time = Instant::now();
        tracing::info!(
            "Starting crawl of {} (max pages {}, max depth {}, delay {:?}, follow external {})",
            self.seed,
            self.budget.max_pages,
            self.budget.max_depth,
            self.budget.request_delay,
            self.budget.follow_external
        );

        self.transition(CrawlPhase::Seeding)?;
        self.check_seed().await?;
        self.seed_frontier().await;

        if self.check_shutdown() {
            self.transition(CrawlPhase::Draining)?;
        } else {
            self.transition(CrawlPhase::Traversing)?;
            self.traverse().await;
            self.transition(CrawlPhase::Draining)?;
        }

        let dropped = self.frontier.clear_pending();
        if dropped > 0 {
            tracing::info!("Leaving {} queued URLs unvisited", dropped);
        }
        self.transition(CrawlPhase::Done)?;
        self.stats.finish();

        tracing::info!(
            "Crawl {}: {} PDFs found across {} pages in {:?}",
            if self.interrupted {
                "interrupted"
            } else {
                "completed"
            },
            self.store.len(),
            self.stats.pages_crawled,
            start_time.elapsed()
        );

        Ok(CrawlOutcome {
            store: self.store,
            stats: self.stats,
            sitemap_urls: self.sitemap_urls,
            interrupted: self.interrupted,
        })
    }

    fn transition(&mut self, next: CrawlPhase) -> Result<()> {
        if !self.phase.can_transition_to(next) {
            return Err(ScoutError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!("Crawl phase {} -> {}", self.phase.as_str(), next.as_str());
        self.phase = next;
        Ok(())
    }

    fn check_shutdown(&mut self) -> bool {
        if self.shutdown.is_triggered() && !self.interrupted {
            tracing::info!("Crawl interrupted, keeping results gathered so far");
            self.interrupted = true;
        }
        self.interrupted
    }

    /// HEADs the seed; only a transport failure counts as unreachable
    async fn check_seed(&mut self) -> Result<()> {
        self.gate.ensure_policy(self.client.as_ref(), &self.seed).await;

        let host = host_key(&self.seed);
        self.gate.wait_if_needed(&host).await;
        let result = self
            .client
            .head(self.seed.as_str(), &[], self.fetch_options.timeout)
            .await;
        self.gate.record_request_end(&host);

        match result {
            Ok(response) => {
                tracing::debug!("Seed {} answered HTTP {}", self.seed, response.status);
                Ok(())
            }
            Err(e) => Err(ConfigError::UnreachableSeed {
                url: self.seed.to_string(),
                reason: e.to_string(),
            }
            .into()),
        }
    }

    async fn seed_frontier(&mut self) {
        self.enqueue(FrontierEntry::seed(self.seed.clone()));

        if self.config.crawler.use_sitemaps && !self.check_shutdown() {
            self.seed_from_sitemaps().await;
        }

        tracing::info!("Frontier seeded with {} URLs", self.frontier.len());
    }

    async fn seed_from_sitemaps(&mut self) {
        let host = host_key(&self.seed);
        let seeder = SitemapSeeder::new(Arc::clone(&self.client), self.fetch_options.timeout)
            .with_request_delay(self.gate.effective_delay(&host));
        let mut discovery = seeder
            .discover(&self.seed)
            .with_robots(self.gate.policy(&host).cloned());

        self.gate.wait_if_needed(&host).await;
        while let Some(listed) = discovery.next_url().await {
            if self.check_shutdown() {
                break;
            }
            self.sitemap_urls.push(listed.clone());

            let url = match canonicalize_url(&listed) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Ignoring sitemap entry {}: {}", listed, e);
                    continue;
                }
            };

            if self.classifier.is_candidate(&url) {
                let source = discovery.sources().last().cloned().unwrap_or_default();
                self.record_pdf(&url, "", "", &source, 0).await;
                continue;
            }

            self.follow(FrontierEntry::seed(url));
        }
        self.gate.record_request_end(&host);

        if !self.sitemap_urls.is_empty() {
            tracing::info!(
                "Found {} URLs in {} sitemaps",
                self.sitemap_urls.len(),
                discovery.sources().len()
            );
        }
    }

    async fn traverse(&mut self) {
        loop {
            if self.check_shutdown() {
                break;
            }

            if self.pages_attempted >= self.budget.max_pages {
                tracing::info!("Page budget of {} reached", self.budget.max_pages);
                break;
            }

            let Some(entry) = self.frontier.pop() else {
                tracing::info!("Frontier exhausted");
                break;
            };

            if entry.depth > self.budget.max_depth {
                continue;
            }

            self.process_entry(entry).await;
        }
    }

    /// Fetches one frontier entry and handles what it returns
    async fn process_entry(&mut self, entry: FrontierEntry) {
        if self.frontier.was_fetched(entry.key()) {
            self.stats.duplicate_urls_skipped += 1;
            return;
        }

        if !self.gate.check(self.client.as_ref(), &entry.url).await {
            tracing::info!("Blocked by robots.txt: {}", entry.url);
            self.stats.robots_blocked_urls += 1;
            return;
        }

        self.frontier.mark_fetched(entry.key());
        self.pages_attempted += 1;

        let host = host_key(&entry.url);
        self.gate.wait_if_needed(&host).await;
        tracing::debug!("Fetching (depth {}): {}", entry.depth, entry.url);
        let result = fetch_page(
            self.client.as_ref(),
            self.extractor.as_ref(),
            &entry.url,
            &self.fetch_options,
        )
        .await;
        self.gate.record_request_end(&host);

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Failed to crawl {}: {}", entry.url, e.reason());
                self.stats.record_failure(entry.url.as_str(), e.reason());
                return;
            }
        };

        self.stats
            .record_page(&extract_domain(&page.final_url).unwrap_or_default());
        if self.stats.pages_crawled % PROGRESS_INTERVAL == 0 {
            tracing::info!(
                "Progress: {} pages crawled, {} in frontier, {} PDFs, {:.2} pages/sec",
                self.stats.pages_crawled,
                self.frontier.len(),
                self.store.len(),
                self.stats.pages_per_second()
            );
        }

        // A redirect target counts as fetched too
        if let Ok(landed) = canonicalize_url(page.final_url.as_str()) {
            if landed.as_str() != entry.key() && !self.frontier.mark_fetched(landed.as_str()) {
                tracing::debug!("{} redirected to already crawled {}", entry.url, landed);
                return;
            }
        }

        match page.kind {
            ContentKind::Pdf => self.record_served_pdf(&entry, &page),
            ContentKind::Html => self.process_links(&entry, &page).await,
            ContentKind::Other => {
                tracing::debug!(
                    "No links in {} ({})",
                    entry.url,
                    page.content_type.as_deref().unwrap_or("no content type")
                );
            }
        }
    }

    /// A frontier page that turned out to be a PDF
    fn record_served_pdf(&mut self, entry: &FrontierEntry, page: &PageResult) {
        if !self.seen_pdfs.insert(entry.key().to_string()) {
            return;
        }

        let probe = ProbeInfo {
            status: page.status,
            content_type: page.content_type.clone(),
            content_length: page.content_length,
            last_modified: page.last_modified.clone(),
            final_url: page.final_url.to_string(),
        };
        let link = PdfLink {
            url: &entry.url,
            link_text: &entry.link_text,
            link_context: &entry.link_context,
            discovered_on_page: &entry.discovered_on_page,
            // depth of the page linking to it
            depth: entry.depth.saturating_sub(1),
        };
        self.store_classified(&link, Some(&probe));
    }

    async fn process_links(&mut self, entry: &FrontierEntry, page: &PageResult) {
        let page_url = page.final_url.to_string();

        for link in &page.links {
            let url = match canonicalize_url(link.url.as_str()) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Skipping link {}: {}", link.url, e);
                    continue;
                }
            };

            if self.classifier.is_candidate(&url) {
                self.record_pdf(&url, &link.text, &link.context, &page_url, entry.depth)
                    .await;
                continue;
            }

            let unreached = self.follow(FrontierEntry {
                url,
                depth: entry.depth + 1,
                discovered_on_page: page_url.clone(),
                link_text: link.text.clone(),
                link_context: link.context.clone(),
            });
            if let Some(unreached) = unreached {
                self.inspect_unreached(&unreached, entry.depth).await;
            }
        }
    }

    /// Enqueues a page link if the follow filter lets it through
    ///
    /// Hands the entry back when only the depth budget or the external-link
    /// policy kept it out, since such a link may still serve a PDF.
    fn follow(&mut self, entry: FrontierEntry) -> Option<FrontierEntry> {
        match follow_decision(&entry.url, &self.seed, self.budget.follow_external) {
            FollowDecision::Follow if entry.depth > self.budget.max_depth => Some(entry),
            FollowDecision::Follow => {
                self.enqueue(entry);
                None
            }
            FollowDecision::External => {
                tracing::debug!("Skipping external link {}", entry.url);
                self.stats.external_urls_skipped += 1;
                Some(entry)
            }
            decision => {
                tracing::debug!("Skipping {} ({:?})", entry.url, decision);
                None
            }
        }
    }

    /// HEADs a link the crawl will not visit and records it if it serves a PDF
    ///
    /// The record takes the depth of the page the link was found on.
    async fn inspect_unreached(&mut self, entry: &FrontierEntry, depth: u32) {
        if !self.config.pdf.probe_pdf_links
            || self.shutdown.is_triggered()
            || self.frontier.is_visited(entry.key())
            || self.seen_pdfs.contains(entry.key())
            || !self.inspected.insert(entry.key().to_string())
        {
            return;
        }

        let spec = self.classifier.request_spec(&entry.url);
        if !spec.inspectable {
            return;
        }
        let Some(probe) = self.probe(&entry.url, &spec).await else {
            return;
        };
        if !(probe.is_success() && probe.is_pdf()) {
            return;
        }

        self.seen_pdfs.insert(entry.key().to_string());
        let link = PdfLink {
            url: &entry.url,
            link_text: &entry.link_text,
            link_context: &entry.link_context,
            discovered_on_page: &entry.discovered_on_page,
            depth,
        };
        self.store_classified(&link, Some(&probe));
    }

    fn enqueue(&mut self, entry: FrontierEntry) -> bool {
        if !self.phase.accepts_enqueues() {
            return false;
        }

        match self.frontier.push(entry) {
            Ok(()) => true,
            Err(EnqueueRejection::Duplicate) => {
                self.stats.duplicate_urls_skipped += 1;
                false
            }
            Err(EnqueueRejection::TooDeep) => false,
        }
    }

    /// Classifies a PDF candidate, probing it first when allowed
    async fn record_pdf(
        &mut self,
        url: &Url,
        link_text: &str,
        link_context: &str,
        discovered_on_page: &str,
        depth: u32,
    ) {
        if !self.seen_pdfs.insert(url.to_string()) {
            self.stats.duplicate_urls_skipped += 1;
            return;
        }

        let spec = self.classifier.request_spec(url);
        let probe = if self.config.pdf.probe_pdf_links && spec.inspectable {
            self.probe(url, &spec).await
        } else {
            None
        };

        let link = PdfLink {
            url,
            link_text,
            link_context,
            discovered_on_page,
            depth,
        };
        self.store_classified(&link, probe.as_ref());
    }

    /// HEAD request for a PDF candidate, subject to the politeness gate
    async fn probe(&mut self, url: &Url, spec: &RequestSpec) -> Option<ProbeInfo> {
        let target = Url::parse(&spec.url).ok()?;
        if !self.gate.check(self.client.as_ref(), &target).await {
            tracing::debug!("Not probing {}: disallowed by robots.txt", target);
            return None;
        }

        let host = host_key(&target);
        self.gate.wait_if_needed(&host).await;
        let result = probe_link(
            self.client.as_ref(),
            &spec.url,
            &spec.headers,
            self.fetch_options.timeout,
        )
        .await;
        self.gate.record_request_end(&host);

        match result {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::debug!("Probe of {} failed: {}", url, e.reason());
                None
            }
        }
    }

    fn store_classified(&mut self, link: &PdfLink<'_>, probe: Option<&ProbeInfo>) {
        match self.classifier.evaluate(link, probe) {
            Ok(record) => {
                tracing::debug!(
                    "Discovered PDF: {} ({:.2})",
                    record.title,
                    record.confidence_score
                );
                if self.store.add(record) {
                    self.stats.pdfs_found += 1;
                }
            }
            Err(rejection) => {
                tracing::debug!("Not recording {}: {:?}", link.url, rejection);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlMode;
    use crate::crawler::parser::RawLink;
    use crate::crawler::{Method, TransportError};
    use crate::testing::ScriptedHttpClient;

    const SEED: &str = "https://example.edu/";

    fn test_config() -> Config {
        let mut config = Config::default();
        config.crawler.request_delay_seconds = 0.0;
        config.crawler.max_crawl_depth = 1;
        config.crawler.max_pages_per_site = 10;
        config
    }

    fn page(links: &[&str]) -> String {
        let anchors: String = links
            .iter()
            .map(|href| format!("<p><a href=\"{}\">{}</a></p>", href, href))
            .collect();
        format!("<html><body>{}</body></html>", anchors)
    }

    async fn crawl_with(config: Config, client: Arc<ScriptedHttpClient>) -> CrawlOutcome {
        Coordinator::new(Arc::new(config), SEED, client)
            .unwrap()
            .run()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_pdf_same_site_and_external_links() {
        let client = Arc::new(
            ScriptedHttpClient::new()
                .html(
                    SEED,
                    &page(&["/paper.pdf", "/about", "https://other.org/page"]),
                )
                .pdf("https://example.edu/paper.pdf", 2_097_152)
                .html("https://example.edu/about", &page(&[]))
                .html("https://other.org/page", &page(&[])),
        );

        let outcome = crawl_with(test_config(), client.clone()).await;

        assert_eq!(outcome.store.len(), 1);
        let record = &outcome.store.records()[0];
        assert_eq!(record.url, "https://example.edu/paper.pdf");
        assert_eq!(record.file_size_bytes, Some(2_097_152));
        assert_eq!(record.discovered_on_page, SEED);
        assert_eq!(record.depth, 0);

        assert_eq!(outcome.stats.pages_crawled, 2);
        assert_eq!(outcome.stats.external_urls_skipped, 1);
        assert_eq!(outcome.stats.pdfs_found, 1);
        assert_eq!(client.count(Method::Get, "https://other.org/page"), 0);
        // checked for PDF content, but not crawled
        assert_eq!(client.count(Method::Head, "https://other.org/page"), 1);
        assert_eq!(client.count(Method::Get, "https://example.edu/paper.pdf"), 0);
        assert!(!outcome.interrupted);
    }

    #[tokio::test]
    async fn test_no_url_fetched_twice() {
        let client = Arc::new(
            ScriptedHttpClient::new()
                .html(SEED, &page(&["/old", "/about", "/about#team", "/"]))
                .redirect(
                    "https://example.edu/old",
                    "https://example.edu/about",
                    &page(&["/", "/about"]),
                )
                .html("https://example.edu/about", &page(&[])),
        );

        let outcome = crawl_with(test_config(), client.clone()).await;

        assert_eq!(client.count(Method::Get, SEED), 1);
        assert_eq!(client.count(Method::Get, "https://example.edu/old"), 1);
        assert_eq!(client.count(Method::Get, "https://example.edu/about"), 0);
        assert_eq!(outcome.stats.pages_crawled, 2);
        assert!(outcome.stats.duplicate_urls_skipped >= 2);
    }

    #[tokio::test]
    async fn test_page_budget() {
        let client = Arc::new(
            ScriptedHttpClient::new()
                .html(SEED, &page(&["/a", "/b", "/c"]))
                .html("https://example.edu/a", &page(&[]))
                .html("https://example.edu/b", &page(&[]))
                .html("https://example.edu/c", &page(&[])),
        );
        let mut config = test_config();
        config.crawler.max_pages_per_site = 2;

        let outcome = crawl_with(config, client.clone()).await;

        assert_eq!(outcome.stats.pages_crawled, 2);
        assert_eq!(client.count(Method::Get, "https://example.edu/b"), 0);
        assert_eq!(client.count(Method::Get, "https://example.edu/c"), 0);
    }

    #[tokio::test]
    async fn test_depth_budget() {
        let client = Arc::new(
            ScriptedHttpClient::new()
                .html(SEED, &page(&["/one"]))
                .html("https://example.edu/one", &page(&["/two", "/deep.pdf"]))
                .html("https://example.edu/two", &page(&[]))
                .pdf("https://example.edu/deep.pdf", 50_000),
        );

        let outcome = crawl_with(test_config(), client.clone()).await;

        assert_eq!(client.count(Method::Get, "https://example.edu/two"), 0);
        assert_eq!(outcome.store.len(), 1);
        assert_eq!(outcome.store.records()[0].depth, 1);
    }

    #[tokio::test]
    async fn test_failed_page_does_not_stop_crawl() {
        let client = Arc::new(
            ScriptedHttpClient::new()
                .html(SEED, &page(&["/broken", "/timeout", "/ok"]))
                .respond("https://example.edu/broken", 500, "text/html", "oops")
                .fail("https://example.edu/timeout", TransportError::Timeout)
                .html("https://example.edu/ok", &page(&[])),
        );

        let outcome = crawl_with(test_config(), client.clone()).await;

        assert_eq!(outcome.stats.pages_crawled, 2);
        assert_eq!(outcome.stats.errors_count, 2);
        let failed: Vec<&str> = outcome
            .stats
            .failed_urls
            .iter()
            .map(|f| f.url.as_str())
            .collect();
        assert!(failed.contains(&"https://example.edu/broken"));
        assert!(failed.contains(&"https://example.edu/timeout"));
    }

    #[tokio::test]
    async fn test_robots_disallowed_page_not_fetched() {
        let client = Arc::new(
            ScriptedHttpClient::new()
                .respond(
                    "https://example.edu/robots.txt",
                    200,
                    "text/plain",
                    "User-agent: *\nDisallow: /private/\n",
                )
                .html(SEED, &page(&["/private/notes", "/public"]))
                .html("https://example.edu/private/notes", &page(&[]))
                .html("https://example.edu/public", &page(&[])),
        );

        let outcome = crawl_with(test_config(), client.clone()).await;

        assert_eq!(
            client.count(Method::Get, "https://example.edu/private/notes"),
            0
        );
        assert_eq!(client.count(Method::Get, "https://example.edu/robots.txt"), 1);
        assert_eq!(outcome.stats.robots_blocked_urls, 1);
        assert_eq!(outcome.stats.pages_crawled, 2);
    }

    #[tokio::test]
    async fn test_sitemap_urls_seed_frontier() {
        let sitemap = r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"><url><loc>https://example.edu/listed</loc></url><url><loc>https://example.edu/files/report.pdf</loc></url></urlset>"#;
        let client = Arc::new(
            ScriptedHttpClient::new()
                .respond("https://example.edu/sitemap.xml", 200, "application/xml", sitemap)
                .html(SEED, &page(&[]))
                .html("https://example.edu/listed", &page(&[]))
                .pdf("https://example.edu/files/report.pdf", 80_000),
        );

        let outcome = crawl_with(test_config(), client.clone()).await;

        assert_eq!(outcome.sitemap_urls.len(), 2);
        assert_eq!(client.count(Method::Get, "https://example.edu/listed"), 1);
        assert_eq!(outcome.store.len(), 1);
        let record = &outcome.store.records()[0];
        assert_eq!(record.discovered_on_page, "https://example.edu/sitemap.xml");
        assert_eq!(record.depth, 0);
    }

    #[tokio::test]
    async fn test_pdf_served_without_pdf_extension() {
        let client = Arc::new(
            ScriptedHttpClient::new()
                .html(SEED, &page(&["/download?id=7"]))
                .pdf("https://example.edu/download?id=7", 300_000),
        );

        let outcome = crawl_with(test_config(), client).await;

        assert_eq!(outcome.store.len(), 1);
        let record = &outcome.store.records()[0];
        assert_eq!(record.url, "https://example.edu/download?id=7");
        assert_eq!(record.file_size_bytes, Some(300_000));
        assert_eq!(record.depth, 0);
    }

    #[tokio::test]
    async fn test_pdf_content_type_beyond_depth_limit() {
        let client = Arc::new(
            ScriptedHttpClient::new()
                .html(SEED, &page(&["/download/42", "/about"]))
                .pdf("https://example.edu/download/42", 300_000)
                .html("https://example.edu/about", &page(&[])),
        );
        let mut config = test_config();
        config.crawler.max_crawl_depth = 0;

        let outcome = crawl_with(config, client.clone()).await;

        assert_eq!(outcome.store.len(), 1);
        let record = &outcome.store.records()[0];
        assert_eq!(record.url, "https://example.edu/download/42");
        assert_eq!(record.file_size_bytes, Some(300_000));
        assert_eq!(record.content_type.as_deref(), Some("application/pdf"));
        assert_eq!(record.discovered_on_page, SEED);
        assert_eq!(record.depth, 0);

        assert_eq!(outcome.stats.pages_crawled, 1);
        assert_eq!(client.count(Method::Get, "https://example.edu/download/42"), 0);
        assert_eq!(client.count(Method::Head, "https://example.edu/download/42"), 1);
        assert_eq!(client.count(Method::Get, "https://example.edu/about"), 0);
    }

    #[tokio::test]
    async fn test_external_pdf_found_by_content_type() {
        let client = Arc::new(
            ScriptedHttpClient::new()
                .html(
                    SEED,
                    &page(&["https://files.other.org/get/9", "https://files.other.org/get/9"]),
                )
                .pdf("https://files.other.org/get/9", 200_000),
        );

        let outcome = crawl_with(test_config(), client.clone()).await;

        assert_eq!(outcome.store.len(), 1);
        let record = &outcome.store.records()[0];
        assert_eq!(record.url, "https://files.other.org/get/9");
        assert_eq!(record.domain, "files.other.org");
        assert_eq!(record.depth, 0);
        assert_eq!(outcome.stats.external_urls_skipped, 2);
        assert_eq!(client.count(Method::Get, "https://files.other.org/get/9"), 0);
        assert_eq!(client.count(Method::Head, "https://files.other.org/get/9"), 1);
    }

    #[tokio::test]
    async fn test_unreached_links_not_checked_when_probing_disabled() {
        let client = Arc::new(
            ScriptedHttpClient::new()
                .html(SEED, &page(&["https://files.other.org/get/9"]))
                .pdf("https://files.other.org/get/9", 200_000),
        );
        let mut config = test_config();
        config.pdf.probe_pdf_links = false;

        let outcome = crawl_with(config, client.clone()).await;

        assert!(outcome.store.is_empty());
        assert_eq!(client.count(Method::Head, "https://files.other.org/get/9"), 0);
    }

    #[tokio::test]
    async fn test_huge_robots_crawl_delay_does_not_stall() {
        let client = Arc::new(
            ScriptedHttpClient::new()
                .respond(
                    "https://example.edu/robots.txt",
                    200,
                    "text/plain",
                    "User-agent: *\nCrawl-delay: 1e20\n",
                )
                .html(SEED, &page(&["/next"]))
                .html("https://example.edu/next", &page(&[])),
        );
        let mut config = test_config();
        config.crawler.max_crawl_delay_seconds = 0.0;

        let outcome = crawl_with(config, client).await;

        assert_eq!(outcome.stats.pages_crawled, 2);
    }

    #[tokio::test]
    async fn test_site_mode_rejects_small_pdfs() {
        let client = Arc::new(
            ScriptedHttpClient::new()
                .html(SEED, &page(&["/tiny.pdf", "/fine.pdf"]))
                .pdf("https://example.edu/tiny.pdf", 1024)
                .pdf("https://example.edu/fine.pdf", 64 * 1024),
        );

        let outcome = crawl_with(test_config(), client).await;

        assert_eq!(outcome.store.len(), 1);
        assert_eq!(outcome.store.records()[0].url, "https://example.edu/fine.pdf");
    }

    #[tokio::test]
    async fn test_book_mode_scores_records() {
        let client = Arc::new(
            ScriptedHttpClient::new()
                .html(
                    SEED,
                    &page(&["/Deep_Learning-Ian_Goodfellow.pdf", "/tiny.pdf"]),
                )
                .pdf(
                    "https://example.edu/Deep_Learning-Ian_Goodfellow.pdf",
                    5 * 1024 * 1024,
                )
                .pdf("https://example.edu/tiny.pdf", 1024),
        );
        let mut config = test_config();
        config.crawler.mode = CrawlMode::Book;

        let outcome = crawl_with(config, client).await;

        // book crawls keep small files and score them down instead
        assert_eq!(outcome.store.len(), 2);
        let book = outcome
            .store
            .records()
            .iter()
            .find(|r| r.url.contains("Goodfellow"))
            .unwrap();
        assert_eq!(book.author.as_deref(), Some("Ian Goodfellow"));
        assert!(book.title.contains("Deep Learning"));
        assert!(book.confidence_score > 0.35);
        for record in outcome.store.records() {
            assert!((0.0..=1.0).contains(&record.confidence_score));
        }
    }

    #[tokio::test]
    async fn test_duplicate_pdf_links_probed_once() {
        let client = Arc::new(
            ScriptedHttpClient::new()
                .html(SEED, &page(&["/a.pdf", "/other"]))
                .html("https://example.edu/other", &page(&["/a.pdf", "/a.pdf#p=2"]))
                .pdf("https://example.edu/a.pdf", 64 * 1024),
        );

        let outcome = crawl_with(test_config(), client.clone()).await;

        assert_eq!(client.count(Method::Head, "https://example.edu/a.pdf"), 1);
        assert_eq!(outcome.store.len(), 1);
        assert_eq!(outcome.store.records()[0].discovered_on_page, SEED);
    }

    #[tokio::test]
    async fn test_unreachable_seed_is_an_error() {
        let client = Arc::new(ScriptedHttpClient::new().fail(
            SEED,
            TransportError::Connect("connection refused".to_string()),
        ));

        let result = Coordinator::new(Arc::new(test_config()), SEED, client)
            .unwrap()
            .run()
            .await;

        assert!(matches!(
            result,
            Err(ScoutError::Config(ConfigError::UnreachableSeed { .. }))
        ));
    }

    #[test]
    fn test_invalid_seed_rejected() {
        let client = Arc::new(ScriptedHttpClient::new());
        assert!(Coordinator::new(Arc::new(test_config()), "ftp://example.edu/", client).is_err());
    }

    #[tokio::test]
    async fn test_shutdown_before_traversal() {
        let client = Arc::new(ScriptedHttpClient::new().html(SEED, &page(&["/a"])));
        let shutdown = ShutdownSignal::new();
        shutdown.trigger();

        let outcome = Coordinator::new(Arc::new(test_config()), SEED, client.clone())
            .unwrap()
            .with_shutdown(shutdown)
            .run()
            .await
            .unwrap();

        assert!(outcome.interrupted);
        assert_eq!(outcome.stats.pages_crawled, 0);
        assert_eq!(client.count(Method::Get, SEED), 0);
    }

    /// Fires the shutdown signal once the first page has been parsed
    struct InterruptingExtractor {
        inner: ScraperLinkExtractor,
        shutdown: ShutdownSignal,
    }

    impl LinkExtractor for InterruptingExtractor {
        fn extract_links(&self, body: &str, scope_selector: Option<&str>) -> Vec<RawLink> {
            self.shutdown.trigger();
            self.inner.extract_links(body, scope_selector)
        }
    }

    #[tokio::test]
    async fn test_shutdown_mid_crawl_keeps_results() {
        let client = Arc::new(
            ScriptedHttpClient::new()
                .html(SEED, &page(&["/report.pdf", "/next"]))
                .pdf("https://example.edu/report.pdf", 64 * 1024)
                .html("https://example.edu/next", &page(&[])),
        );
        let shutdown = ShutdownSignal::new();
        let extractor = Arc::new(InterruptingExtractor {
            inner: ScraperLinkExtractor::default(),
            shutdown: shutdown.clone(),
        });

        let outcome = Coordinator::new(Arc::new(test_config()), SEED, client.clone())
            .unwrap()
            .with_extractor(extractor)
            .with_shutdown(shutdown)
            .run()
            .await
            .unwrap();

        assert!(outcome.interrupted);
        assert_eq!(outcome.stats.pages_crawled, 1);
        assert_eq!(outcome.store.len(), 1);
        assert_eq!(client.count(Method::Get, "https://example.edu/next"), 0);
    }
}
