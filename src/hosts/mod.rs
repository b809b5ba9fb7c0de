//! File host capability registry
//!
//! Some PDF links do not point at the file itself but at a file-sharing
//! service. A [`HostStrategy`] knows whether it handles a URL and how to turn
//! it into a request that reaches the file, or that the file cannot be
//! inspected at all. [`HostRegistry`] picks the strategy by host suffix.

use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

/// Content type recorded for PDFs on services that cannot be probed
pub const EXTERNAL_SERVICE_CONTENT_TYPE: &str = "application/pdf (external service)";

/// How to request a file from its host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// False when HEAD/GET on `url` says nothing useful about the file
    pub inspectable: bool,
}

impl RequestSpec {
    pub fn direct(url: &Url) -> Self {
        Self {
            url: url.to_string(),
            headers: Vec::new(),
            inspectable: true,
        }
    }
}

/// Per-host handling of file links
pub trait HostStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether links on this host (matched by the registry) point at files
    fn supports_url(&self, url: &Url) -> bool;

    fn prepare(&self, url: &Url) -> RequestSpec;

    /// True for the fallback strategy used by ordinary web servers
    fn is_direct(&self) -> bool {
        false
    }
}

/// Plain web servers: the link is the file
#[derive(Debug, Default)]
pub struct DirectStrategy;

impl HostStrategy for DirectStrategy {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn supports_url(&self, _url: &Url) -> bool {
        true
    }

    fn prepare(&self, url: &Url) -> RequestSpec {
        RequestSpec::direct(url)
    }

    fn is_direct(&self) -> bool {
        true
    }
}

/// Google Drive share links, rewritten to the direct download endpoint
#[derive(Debug, Default)]
pub struct GoogleDriveStrategy;

impl GoogleDriveStrategy {
    /// File id from `/file/d/<id>/...` or an `id=` query parameter
    pub fn file_id(url: &Url) -> Option<String> {
        let mut segments = url.path_segments()?;
        while let Some(segment) = segments.next() {
            if segment == "d" {
                return segments
                    .next()
                    .filter(|id| !id.is_empty())
                    .map(str::to_string);
            }
        }

        url.query_pairs()
            .find(|(key, _)| key == "id")
            .map(|(_, value)| value.into_owned())
            .filter(|id| !id.is_empty())
    }
}

impl HostStrategy for GoogleDriveStrategy {
    fn name(&self) -> &'static str {
        "google-drive"
    }

    fn supports_url(&self, url: &Url) -> bool {
        Self::file_id(url).is_some()
    }

    fn prepare(&self, url: &Url) -> RequestSpec {
        match Self::file_id(url) {
            Some(id) => RequestSpec {
                url: format!("https://drive.google.com/uc?export=download&id={}", id),
                headers: Vec::new(),
                inspectable: true,
            },
            None => RequestSpec::direct(url),
        }
    }
}

/// Dropbox share links, switched to direct download with `dl=1`
#[derive(Debug, Default)]
pub struct DropboxStrategy;

impl HostStrategy for DropboxStrategy {
    fn name(&self) -> &'static str {
        "dropbox"
    }

    fn supports_url(&self, url: &Url) -> bool {
        url.path().len() > 1
    }

    fn prepare(&self, url: &Url) -> RequestSpec {
        let mut download = url.clone();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "dl")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        download
            .query_pairs_mut()
            .clear()
            .extend_pairs(pairs)
            .append_pair("dl", "1");

        RequestSpec {
            url: download.to_string(),
            headers: Vec::new(),
            inspectable: true,
        }
    }
}

/// Services whose pages wrap the file behind scripts or logins
#[derive(Debug)]
pub struct OpaqueServiceStrategy {
    name: &'static str,
    /// Only links mentioning "pdf" count as documents
    requires_pdf_hint: bool,
}

impl OpaqueServiceStrategy {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            requires_pdf_hint: false,
        }
    }

    pub fn requiring_pdf_hint(name: &'static str) -> Self {
        Self {
            name,
            requires_pdf_hint: true,
        }
    }
}

impl HostStrategy for OpaqueServiceStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supports_url(&self, url: &Url) -> bool {
        !self.requires_pdf_hint || url.as_str().to_ascii_lowercase().contains("pdf")
    }

    fn prepare(&self, url: &Url) -> RequestSpec {
        RequestSpec {
            inspectable: false,
            ..RequestSpec::direct(url)
        }
    }
}

/// Maps hosts to strategies
pub struct HostRegistry {
    by_suffix: HashMap<String, Arc<dyn HostStrategy>>,
    direct: Arc<dyn HostStrategy>,
}

impl HostRegistry {
    /// A registry that treats every host as a plain web server
    pub fn empty() -> Self {
        Self {
            by_suffix: HashMap::new(),
            direct: Arc::new(DirectStrategy),
        }
    }

    /// Registers `strategy` for `host_suffix` and all of its subdomains
    pub fn register(&mut self, host_suffix: &str, strategy: Arc<dyn HostStrategy>) {
        self.by_suffix
            .insert(host_suffix.trim_start_matches('.').to_ascii_lowercase(), strategy);
    }

    /// Strategy for a URL: the longest registered suffix of its host wins
    pub fn resolve(&self, url: &Url) -> &dyn HostStrategy {
        let Some(host) = url.host_str() else {
            return self.direct.as_ref();
        };
        let host = host.to_ascii_lowercase();

        let mut candidate = host.as_str();
        loop {
            if let Some(strategy) = self.by_suffix.get(candidate) {
                return strategy.as_ref();
            }
            match candidate.split_once('.') {
                Some((_, rest)) if rest.contains('.') => candidate = rest,
                _ => return self.direct.as_ref(),
            }
        }
    }

    /// True when the URL is a document on a registered file host
    pub fn is_file_host(&self, url: &Url) -> bool {
        let strategy = self.resolve(url);
        !strategy.is_direct() && strategy.supports_url(url)
    }

    pub fn prepare(&self, url: &Url) -> RequestSpec {
        let strategy = self.resolve(url);
        if strategy.supports_url(url) {
            strategy.prepare(url)
        } else {
            RequestSpec::direct(url)
        }
    }

    pub fn len(&self) -> usize {
        self.by_suffix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_suffix.is_empty()
    }
}

impl Default for HostRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("drive.google.com", Arc::new(GoogleDriveStrategy));
        registry.register("dropbox.com", Arc::new(DropboxStrategy));
        registry.register(
            "mediafire.com",
            Arc::new(OpaqueServiceStrategy::requiring_pdf_hint("mediafire")),
        );
        for (host, name) in [
            ("mega.nz", "mega"),
            ("docdro.id", "docdroid"),
            ("userscloud.com", "userscloud"),
            ("app.box.com", "box"),
            ("scribd.com", "scribd"),
            ("academia.edu", "academia"),
            ("researchgate.net", "researchgate"),
        ] {
            registry.register(host, Arc::new(OpaqueServiceStrategy::new(name)));
        }
        registry
    }
}
