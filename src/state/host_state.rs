use std::time::{Duration, Instant};

/// Politeness bookkeeping for one host
///
/// The delay is measured from the end of the previous request, so a slow
/// response already counts toward the wait.
#[derive(Debug, Clone, Default)]
pub struct HostState {
    /// Number of requests completed against this host
    pub request_count: u32,

    /// When the last request to this host finished
    pub last_request_end: Option<Instant>,

    /// Crawl-delay announced in the host's robots.txt
    pub crawl_delay: Option<Duration>,
}

impl HostState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The delay in force for this host: the larger of `min_delay` and the
    /// robots.txt crawl delay
    pub fn effective_delay(&self, min_delay: Duration) -> Duration {
        match self.crawl_delay {
            Some(delay) => delay.max(min_delay),
            None => min_delay,
        }
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    pub fn time_until_next_request(&self, min_delay: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_request_end?;
        let delay = self.effective_delay(min_delay);
        let elapsed = now.saturating_duration_since(last);
        if elapsed < delay {
            Some(delay - elapsed)
        } else {
            None
        }
    }

    /// Records that a request to this host just finished
    pub fn record_request_end(&mut self, now: Instant) {
        self.request_count += 1;
        self.last_request_end = Some(now);
    }
}
