//! URL handling module for pdf-scout
//!
//! This module provides URL canonicalization, host helpers, and the filter
//! that decides which non-PDF links are crawled as pages.

mod domain;
mod filter;
mod normalize;

pub use domain::{extract_domain, host_key, is_same_site, strip_www};
pub use filter::{follow_decision, path_extension, FollowDecision};
pub use normalize::{canonical_key, canonicalize_url};
