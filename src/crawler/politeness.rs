//! Politeness gate
//!
//! Combines robots.txt compliance with a minimum delay between requests to
//! the same host. Robots policies are fetched lazily, once per host.

use crate::config::bounded_seconds;
use crate::crawler::HttpClient;
use crate::robots::{fetch_robots, ParsedRobots, RobotsCache};
use crate::state::HostState;
use crate::url::host_key;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use url::Url;

pub struct PolitenessGate {
    user_agent: String,
    min_delay: Duration,
    max_delay: Duration,
    timeout: Duration,
    respect_robots: bool,
    robots: RobotsCache,
    hosts: HashMap<String, HostState>,
}

impl PolitenessGate {
    /// Creates a gate
    ///
    /// # Arguments
    ///
    /// * `user_agent` - User-Agent header; its product token selects robots groups
    /// * `min_delay` - Configured delay between requests to one host
    /// * `timeout` - Timeout for robots.txt requests
    /// * `respect_robots` - When false, robots.txt is neither fetched nor honoured
    pub fn new(
        user_agent: impl Into<String>,
        min_delay: Duration,
        timeout: Duration,
        respect_robots: bool,
    ) -> Self {
        Self {
            user_agent: user_agent.into(),
            min_delay,
            max_delay: Duration::MAX,
            timeout,
            respect_robots,
            robots: RobotsCache::new(),
            hosts: HashMap::new(),
        }
    }

    /// Caps robots.txt crawl delays at `max_delay`
    pub fn with_max_crawl_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Fetches robots.txt for the URL's host on first encounter
    pub async fn ensure_policy(&mut self, client: &dyn HttpClient, url: &Url) {
        if !self.respect_robots {
            return;
        }

        let host = host_key(url);
        if self.robots.contains(&host) {
            return;
        }

        self.wait_if_needed(&host).await;
        let policy = fetch_robots(client, &host, self.timeout).await;
        self.record_request_end(&host);

        if let Some(seconds) = policy.crawl_delay(&self.user_agent) {
            let delay = bounded_seconds(seconds, self.max_delay);
            if delay.as_secs_f64() < seconds {
                tracing::warn!(
                    "{} asks for a crawl delay of {}s, using {:?}",
                    host,
                    seconds,
                    delay
                );
            } else {
                tracing::debug!("{} asks for a crawl delay of {}s", host, seconds);
            }
            self.hosts.entry(host.clone()).or_default().crawl_delay = Some(delay);
        }
        self.robots.insert(&host, policy);
    }

    /// Ensures the host's policy is loaded, then checks the URL against it
    pub async fn check(&mut self, client: &dyn HttpClient, url: &Url) -> bool {
        self.ensure_policy(client, url).await;
        self.is_allowed(url)
    }

    /// Checks a URL against the cached policy of its host
    ///
    /// Hosts without a cached policy are allowed.
    pub fn is_allowed(&self, url: &Url) -> bool {
        if !self.respect_robots {
            return true;
        }
        self.robots
            .get(&host_key(url))
            .map(|policy| policy.is_allowed(url.as_str(), &self.user_agent))
            .unwrap_or(true)
    }

    /// Sleeps until the host's delay has elapsed since its last request ended
    pub async fn wait_if_needed(&self, host: &str) {
        if let Some(wait) = self
            .hosts
            .get(host)
            .and_then(|state| state.time_until_next_request(self.min_delay, Instant::now()))
        {
            tracing::trace!("Waiting {:?} before next request to {}", wait, host);
            tokio::time::sleep(wait).await;
        }
    }

    /// Marks the end of a request to `host`
    pub fn record_request_end(&mut self, host: &str) {
        self.hosts
            .entry(host.to_string())
            .or_default()
            .record_request_end(Instant::now());
    }

    /// `max(configured delay, robots crawl-delay)` for a host
    pub fn effective_delay(&self, host: &str) -> Duration {
        self.hosts
            .get(host)
            .map(|state| state.effective_delay(self.min_delay))
            .unwrap_or(self.min_delay)
    }

    pub fn policy(&self, host: &str) -> Option<&ParsedRobots> {
        self.robots.get(host)
    }

    pub fn requests_to(&self, host: &str) -> u32 {
        self.hosts
            .get(host)
            .map(|state| state.request_count)
            .unwrap_or(0)
    }
}
