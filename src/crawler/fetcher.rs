//! Page fetching
//!
//! This module handles:
//! - GET requests for frontier pages through the injected [`HttpClient`]
//! - Mapping transport failures and error statuses to [`FetchError`]
//! - Extracting and resolving outbound links from HTML responses
//! - Lightweight HEAD / range probes for PDF links

use crate::crawler::http::{HttpClient, HttpRequest, HttpResponse, TransportError};
use crate::crawler::parser::{resolve_link, LinkExtractor};
use crate::{FetchError, FetchErrorKind};
use std::time::Duration;
use url::Url;

/// Broad classification of a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Html,
    Pdf,
    Other,
}

impl ContentKind {
    /// Classifies a Content-Type header value; a missing header counts as HTML
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let Some(content_type) = content_type else {
            return Self::Html;
        };
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            "text/html" | "application/xhtml+xml" | "" => Self::Html,
            "application/pdf" | "application/x-pdf" => Self::Pdf,
            _ => Self::Other,
        }
    }
}

/// An outbound link found on a page, resolved against the final page URL
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedLink {
    pub url: Url,
    pub text: String,
    pub context: String,
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct PageResult {
    /// URL that was requested
    pub url: Url,
    /// URL after redirects
    pub final_url: Url,
    pub status: u16,
    pub content_type: Option<String>,
    pub kind: ContentKind,
    pub content_length: Option<u64>,
    pub last_modified: Option<String>,
    /// Empty unless the page is HTML
    pub links: Vec<ExtractedLink>,
}

/// Options for a page fetch
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub max_page_bytes: usize,
    pub scope_selector: Option<String>,
}

/// What a HEAD (or range GET) request revealed about a link
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeInfo {
    pub status: u16,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub last_modified: Option<String>,
    pub final_url: String,
}

impl ProbeInfo {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_pdf(&self) -> bool {
        ContentKind::from_content_type(self.content_type.as_deref()) == ContentKind::Pdf
    }

    /// Builds probe information from a full response
    pub fn from_response(response: &HttpResponse) -> Self {
        Self {
            status: response.status,
            content_type: response.content_type().map(str::to_string),
            content_length: response.content_length(),
            last_modified: response.header("last-modified").map(str::to_string),
            final_url: response.final_url.clone(),
        }
    }
}

/// Fetches one page and extracts its links
///
/// # Request Flow
///
/// 1. GET the URL (the client follows redirects)
/// 2. Status >= 400 → `FetchError::HttpStatus`
/// 3. HTML → body parsed, links resolved against the final URL
///    - A body cut off at `max_page_bytes` → `FetchError::ContentTooLarge`
/// 4. PDF and other content types → no links
///
/// Malformed HTML is not an error; it just yields fewer links.
pub async fn fetch_page(
    client: &dyn HttpClient,
    extractor: &dyn LinkExtractor,
    url: &Url,
    options: &FetchOptions,
) -> Result<PageResult, FetchError> {
    let response = client
        .execute(HttpRequest::get(url.as_str(), options.timeout))
        .await
        .map_err(|e| transport_to_fetch_error(url.as_str(), e))?;

    if response.status >= 400 {
        return Err(FetchError::new(
            url.as_str(),
            FetchErrorKind::HttpStatus(response.status),
        ));
    }

    let final_url = Url::parse(&response.final_url).unwrap_or_else(|_| url.clone());
    let content_type = response.content_type().map(str::to_string);
    let kind = ContentKind::from_content_type(content_type.as_deref());

    let links = match kind {
        ContentKind::Html => {
            if response.truncated || response.body.len() > options.max_page_bytes {
                return Err(FetchError::new(
                    url.as_str(),
                    FetchErrorKind::ContentTooLarge {
                        limit: options.max_page_bytes,
                    },
                ));
            }
            extractor
                .extract_links(&response.text(), options.scope_selector.as_deref())
                .into_iter()
                .filter_map(|raw| {
                    resolve_link(&raw.href, &final_url).map(|resolved| ExtractedLink {
                        url: resolved,
                        text: raw.text,
                        context: raw.context,
                    })
                })
                .collect()
        }
        ContentKind::Pdf | ContentKind::Other => Vec::new(),
    };

    Ok(PageResult {
        url: url.clone(),
        final_url,
        status: response.status,
        content_length: response.content_length(),
        last_modified: response.header("last-modified").map(str::to_string),
        content_type,
        kind,
        links,
    })
}

/// Probes a link for its content type and size without downloading it
///
/// Sends HEAD first. Servers that reject HEAD (405/501) get a
/// `Range: bytes=0-0` GET instead, whose `Content-Range` total gives the size.
pub async fn probe_link(
    client: &dyn HttpClient,
    url: &str,
    headers: &[(String, String)],
    timeout: Duration,
) -> Result<ProbeInfo, FetchError> {
    let response = client
        .head(url, headers, timeout)
        .await
        .map_err(|e| transport_to_fetch_error(url, e))?;

    if response.status != 405 && response.status != 501 {
        return Ok(ProbeInfo::from_response(&response));
    }

    tracing::debug!("HEAD rejected for {}, retrying with a range request", url);
    let mut request = HttpRequest::get(url, timeout).with_header("Range", "bytes=0-0");
    request.headers.extend_from_slice(headers);
    let response = client
        .execute(request)
        .await
        .map_err(|e| transport_to_fetch_error(url, e))?;

    let mut info = ProbeInfo::from_response(&response);
    if response.status == 206 {
        info.status = 200;
        info.content_length = response
            .header("content-range")
            .and_then(content_range_total)
            .or(info.content_length.filter(|len| *len > 1));
    }
    Ok(info)
}

/// Total size from a `Content-Range: bytes 0-0/12345` header
fn content_range_total(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}

pub(crate) fn transport_to_fetch_error(url: &str, error: TransportError) -> FetchError {
    let kind = match error {
        TransportError::Timeout => FetchErrorKind::Timeout,
        TransportError::Connect(reason) | TransportError::Other(reason) => {
            FetchErrorKind::Connection(reason)
        }
        TransportError::InvalidUrl(reason) => FetchErrorKind::MalformedUrl(reason),
    };
    FetchError::new(url, kind)
}
