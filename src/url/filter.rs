use crate::url::domain::is_same_site;
use url::Url;

/// Extensions of assets and binary files that are never crawled as pages
const SKIP_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "svg", "ico", "css", "js", "woff", "woff2", "ttf", "zip", "rar",
    "gz", "tar", "exe", "msi", "mp3", "mp4", "avi", "mov", "wmv", "doc", "docx", "xls", "xlsx",
    "ppt", "pptx",
];

/// Path fragments of admin, account and feed areas that are never crawled
const SKIP_PATH_PATTERNS: &[&str] = &[
    "/admin/",
    "/wp-admin/",
    "/api/",
    "/ajax/",
    "/login/",
    "/register/",
    "/logout/",
    "/search/",
    "/feed/",
    "/rss/",
    "/atom/",
    "/sitemap",
];

/// Outcome of deciding whether a non-PDF link joins the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowDecision {
    /// Crawl it
    Follow,
    /// Leaves the seed site and external links are disabled
    External,
    /// Asset or binary file
    Asset,
    /// Admin, login, feed or similar area
    ExcludedPath,
    /// Not http(s)
    UnsupportedScheme,
}

/// Decides whether `url` is worth crawling as a page
///
/// `site` is the seed URL; links to other sites pass only when
/// `follow_external` is set.
pub fn follow_decision(url: &Url, site: &Url, follow_external: bool) -> FollowDecision {
    if url.scheme() != "http" && url.scheme() != "https" {
        return FollowDecision::UnsupportedScheme;
    }

    if !follow_external && !is_same_site(url, site) {
        return FollowDecision::External;
    }

    let path = url.path().to_lowercase();

    if let Some(extension) = path_extension(&path) {
        if SKIP_EXTENSIONS.contains(&extension) {
            return FollowDecision::Asset;
        }
    }

    if SKIP_PATH_PATTERNS
        .iter()
        .any(|pattern| path.contains(pattern))
    {
        return FollowDecision::ExcludedPath;
    }

    FollowDecision::Follow
}

/// Extension of the last path segment, if it has one
pub fn path_extension(path: &str) -> Option<&str> {
    let last_segment = path.rsplit('/').next()?;
    let (stem, extension) = last_segment.rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() {
        None
    } else {
        Some(extension)
    }
}
