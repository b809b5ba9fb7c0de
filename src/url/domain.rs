use url::Url;

/// Extracts the domain from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use pdf_scout::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Strips a leading `www.` from a host
pub fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// True when both URLs belong to the same site
///
/// Hosts are compared case-insensitively and a leading `www.` is ignored,
/// so `www.example.edu` and `example.edu` count as one site. Ports must match.
pub fn is_same_site(a: &Url, b: &Url) -> bool {
    match (extract_domain(a), extract_domain(b)) {
        (Some(host_a), Some(host_b)) => {
            strip_www(&host_a) == strip_www(&host_b)
                && a.port_or_known_default() == b.port_or_known_default()
        }
        _ => false,
    }
}

/// Key identifying a host for politeness bookkeeping (`scheme://host[:port]`)
pub fn host_key(url: &Url) -> String {
    url.origin().ascii_serialization()
}
