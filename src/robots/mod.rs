//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching robots.txt files.

mod cache;
mod parser;

pub use cache::{CachedRobots, RobotsCache};
pub use parser::{product_token, ParsedRobots, RobotsRules};

use crate::crawler::HttpClient;
use std::time::Duration;

/// Fetches and parses `/robots.txt` for a host
///
/// Never fails: a missing file, an error status, a transport failure or an
/// unreadable body all yield an allow-all policy.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `host` - Host key in `scheme://host[:port]` form
/// * `timeout` - Request timeout
pub async fn fetch_robots(client: &dyn HttpClient, host: &str, timeout: Duration) -> ParsedRobots {
    let robots_url = format!("{}/robots.txt", host.trim_end_matches('/'));

    match client.get(&robots_url, &[], timeout).await {
        Ok(response) if response.is_success() => {
            tracing::debug!("Fetched robots.txt for {}", host);
            ParsedRobots::from_content(&response.text())
        }
        Ok(response) => {
            tracing::debug!(
                "No robots.txt for {} (HTTP {}), allowing all",
                host,
                response.status
            );
            ParsedRobots::allow_all()
        }
        Err(e) => {
            tracing::debug!("Failed to fetch robots.txt for {}: {}, allowing all", host, e);
            ParsedRobots::allow_all()
        }
    }
}
