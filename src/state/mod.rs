//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: the Frontier Controller's phase (idle, seeding, traversing, draining, done)
//! - `HostState`: per-host request timing used by the politeness gate

mod crawl_phase;
mod host_state;

pub use crawl_phase::CrawlPhase;
pub use host_state::HostState;
