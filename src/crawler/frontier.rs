//! Crawl frontier
//!
//! This module handles:
//! - The FIFO queue of pages waiting to be fetched (breadth-first order)
//! - The visited set used to de-duplicate URLs at enqueue time
//! - The fetched set guaranteeing no URL is fetched twice

use std::collections::{HashSet, VecDeque};
use url::Url;

/// A page waiting to be fetched
///
/// Created when a link is extracted and never changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontierEntry {
    /// Canonical absolute URL
    pub url: Url,

    /// Link distance from the seed
    pub depth: u32,

    /// Page the link was found on (empty for seeds)
    pub discovered_on_page: String,

    /// Anchor text of the link
    pub link_text: String,

    /// Text surrounding the link
    pub link_context: String,
}

impl FrontierEntry {
    /// Entry for the seed URL or a sitemap URL
    pub fn seed(url: Url) -> Self {
        Self {
            url,
            depth: 0,
            discovered_on_page: String::new(),
            link_text: String::new(),
            link_context: String::new(),
        }
    }

    pub fn key(&self) -> &str {
        self.url.as_str()
    }
}

/// Canonical URLs already enqueued or fetched
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the URL and returns true if it was not already present
    ///
    /// The membership check and the insert are one operation.
    pub fn insert(&mut self, canonical: &str) -> bool {
        self.seen.insert(canonical.to_string())
    }

    pub fn contains(&self, canonical: &str) -> bool {
        self.seen.contains(canonical)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Why an entry was not enqueued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueRejection {
    /// Depth beyond the budget
    TooDeep,
    /// Already enqueued or fetched
    Duplicate,
}

/// Breadth-first frontier
///
/// Entries are popped in enqueue order. Since every child is enqueued with
/// its parent's depth + 1, that order is also non-decreasing by depth.
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    visited: VisitedSet,
    fetched: HashSet<String>,
    max_depth: u32,
}

impl Frontier {
    pub fn new(max_depth: u32) -> Self {
        Self {
            queue: VecDeque::new(),
            visited: VisitedSet::new(),
            fetched: HashSet::new(),
            max_depth,
        }
    }

    /// Adds an entry unless it is too deep or already visited
    pub fn push(&mut self, entry: FrontierEntry) -> Result<(), EnqueueRejection> {
        if entry.depth > self.max_depth {
            return Err(EnqueueRejection::TooDeep);
        }

        if !self.visited.insert(entry.key()) {
            return Err(EnqueueRejection::Duplicate);
        }

        self.queue.push_back(entry);
        Ok(())
    }

    /// Removes the oldest entry
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    /// Records that a URL is being fetched
    ///
    /// Returns false when it was fetched before, in which case the caller
    /// must skip it. Also marks the URL visited so it is never enqueued
    /// later, which covers redirect targets.
    pub fn mark_fetched(&mut self, canonical: &str) -> bool {
        self.visited.insert(canonical);
        self.fetched.insert(canonical.to_string())
    }

    pub fn was_fetched(&self, canonical: &str) -> bool {
        self.fetched.contains(canonical)
    }

    pub fn is_visited(&self, canonical: &str) -> bool {
        self.visited.contains(canonical)
    }

    /// Number of entries waiting
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drops every waiting entry
    pub fn clear_pending(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        dropped
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}
