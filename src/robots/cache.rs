//! Per-host robots.txt cache
//!
//! Policies live for one crawl session. Each host is fetched once, on the
//! first URL seen for it, and reused afterwards.

use crate::robots::ParsedRobots;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A robots.txt policy together with the time it was fetched
#[derive(Debug, Clone)]
pub struct CachedRobots {
    pub policy: ParsedRobots,
    pub fetched_at: DateTime<Utc>,
}

/// Robots policies keyed by host (`scheme://host[:port]`)
#[derive(Debug, Default)]
pub struct RobotsCache {
    entries: HashMap<String, CachedRobots>,
}

impl RobotsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, host: &str) -> Option<&ParsedRobots> {
        self.entries.get(host).map(|entry| &entry.policy)
    }

    pub fn contains(&self, host: &str) -> bool {
        self.entries.contains_key(host)
    }

    /// Stores the policy for a host, replacing nothing if one is already cached
    pub fn insert(&mut self, host: &str, policy: ParsedRobots) -> &ParsedRobots {
        &self
            .entries
            .entry(host.to_string())
            .or_insert_with(|| CachedRobots {
                policy,
                fetched_at: Utc::now(),
            })
            .policy
    }

    pub fn fetched_at(&self, host: &str) -> Option<DateTime<Utc>> {
        self.entries.get(host).map(|entry| entry.fetched_at)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
