//! Robots.txt parser implementation
//!
//! Allow/disallow matching is delegated to the robotstxt crate. Group
//! selection for crawl delays and rule listings, plus `Sitemap:` directives,
//! are read directly from the file.

use robotstxt::DefaultMatcher;

/// Rules of the robots.txt group that applies to one user agent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RobotsRules {
    pub allow: Vec<String>,
    pub disallow: Vec<String>,
    /// Seconds between requests
    pub crawl_delay: Option<f64>,
}

#[derive(Debug, Clone, Default)]
struct Group {
    agents: Vec<String>,
    rules: RobotsRules,
    has_rules: bool,
}

/// Parsed robots.txt data for one host
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content (empty string means allow all)
    content: String,
    allow_all: bool,
    groups: Vec<Group>,
    sitemaps: Vec<String>,
}

impl ParsedRobots {
    /// Parses raw robots.txt content
    ///
    /// Unparsable lines are ignored, so garbage input behaves like an empty
    /// file and allows everything.
    pub fn from_content(content: &str) -> Self {
        let (groups, sitemaps) = parse_groups(content);
        Self {
            content: content.to_string(),
            allow_all: false,
            groups,
            sitemaps,
        }
    }

    /// Creates a permissive policy that allows everything
    ///
    /// Used when robots.txt is missing or cannot be fetched.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            allow_all: true,
            groups: Vec::new(),
            sitemaps: Vec::new(),
        }
    }

    /// Returns the raw robots.txt content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Sitemap URLs announced with `Sitemap:` directives
    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// `user_agent` may be a full User-Agent header; only its product token
    /// is matched against the file.
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.allow_all || self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, product_token(user_agent), url)
    }

    /// Rules of the group that applies to `user_agent`
    ///
    /// A group naming the agent wins over the `*` group.
    pub fn rules_for(&self, user_agent: &str) -> RobotsRules {
        let normalized_agent = product_token(user_agent).to_lowercase();

        let specific = self.groups.iter().find(|group| {
            group
                .agents
                .iter()
                .any(|agent| agent != "*" && normalized_agent.contains(agent.as_str()))
        });

        specific
            .or_else(|| {
                self.groups
                    .iter()
                    .find(|group| group.agents.iter().any(|agent| agent == "*"))
            })
            .map(|group| group.rules.clone())
            .unwrap_or_default()
    }

    /// Gets the crawl delay for a specific user agent, in seconds
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        if self.allow_all {
            return None;
        }
        self.rules_for(user_agent).crawl_delay
    }
}

/// Leading product token of a User-Agent header (`PdfScout/0.1 (+...)` → `PdfScout`)
pub fn product_token(user_agent: &str) -> &str {
    let end = user_agent
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(user_agent.len());
    &user_agent[..end]
}

fn parse_groups(content: &str) -> (Vec<Group>, Vec<String>) {
    let mut groups = Vec::new();
    let mut sitemaps = Vec::new();
    let mut current = Group::default();

    for line in content.lines() {
        let line = line.split('#').next().unwrap_or("").trim();
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();

        match key.as_str() {
            "user-agent" => {
                // Consecutive user-agent lines share one group
                if current.has_rules {
                    groups.push(std::mem::take(&mut current));
                }
                if !value.is_empty() {
                    current.agents.push(value.to_lowercase());
                }
            }
            "allow" | "disallow" | "crawl-delay" if !current.agents.is_empty() => {
                current.has_rules = true;
                match key.as_str() {
                    "allow" if !value.is_empty() => current.rules.allow.push(value.to_string()),
                    "disallow" if !value.is_empty() => {
                        current.rules.disallow.push(value.to_string())
                    }
                    "crawl-delay" => {
                        if let Ok(delay) = value.parse::<f64>() {
                            if delay.is_finite() && delay >= 0.0 {
                                current.rules.crawl_delay = Some(delay);
                            }
                        }
                    }
                    _ => {}
                }
            }
            "sitemap" if !value.is_empty() => sitemaps.push(value.to_string()),
            _ => {}
        }
    }

    if !current.agents.is_empty() {
        groups.push(current);
    }

    (groups, sitemaps)
}
