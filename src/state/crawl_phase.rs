/// Crawl phase definitions
///
/// A crawl moves strictly forward through these phases.
use std::fmt;

/// The phase of the Frontier Controller's state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Constructed, not started
    Idle,

    /// Loading the seed URL and sitemap URLs into the frontier
    Seeding,

    /// Popping and fetching frontier entries
    Traversing,

    /// Budget exhausted, queue empty or interrupted; no new enqueues
    Draining,

    /// Finished; results are ready for reporting
    Done,
}

impl CrawlPhase {
    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// Legal moves: Idle → Seeding → Traversing → Draining → Done, plus
    /// Seeding → Draining when the crawl is interrupted during seeding.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Seeding)
                | (Self::Seeding, Self::Traversing)
                | (Self::Seeding, Self::Draining)
                | (Self::Traversing, Self::Draining)
                | (Self::Draining, Self::Done)
        )
    }

    /// Returns true if new frontier entries may be added in this phase
    pub fn accepts_enqueues(&self) -> bool {
        matches!(self, Self::Seeding | Self::Traversing)
    }

    /// Returns true if this is the terminal phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Seeding => "seeding",
            Self::Traversing => "traversing",
            Self::Draining => "draining",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
