//! HTTP client abstraction
//!
//! The crawl core only talks to the network through [`HttpClient`], so tests
//! and alternative transports can be swapped in. [`ReqwestHttpClient`] is the
//! production implementation.

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Maximum number of redirects followed per request
const MAX_REDIRECTS: usize = 10;

/// HTTP method used by the crawler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
}

/// A single outgoing request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            timeout,
        }
    }

    pub fn head(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: Method::Head,
            ..Self::get(url, timeout)
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// A received response
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    /// Header names are lower-cased
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    /// URL after following redirects
    pub final_url: String,
    /// The body was cut short or not read at all
    pub truncated: bool,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    pub fn content_length(&self) -> Option<u64> {
        self.header("content-length")
            .and_then(|v| v.trim().parse().ok())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure below the HTTP layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("transport error: {0}")]
    Other(String),
}

/// Something that can perform HTTP requests
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        let mut request = HttpRequest::get(url, timeout);
        request.headers.extend_from_slice(headers);
        self.execute(request).await
    }

    async fn head(
        &self,
        url: &str,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        let mut request = HttpRequest::head(url, timeout);
        request.headers.extend_from_slice(headers);
        self.execute(request).await
    }
}

/// Builds the reqwest client used for crawling
///
/// # Example
///
/// ```no_run
/// use pdf_scout::config::UserAgentConfig;
/// use pdf_scout::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`HttpClient`] backed by reqwest
pub struct ReqwestHttpClient {
    client: Client,
    max_body_bytes: usize,
}

impl ReqwestHttpClient {
    /// Wraps a reqwest client; bodies beyond `max_body_bytes` are cut off
    pub fn new(client: Client, max_body_bytes: usize) -> Self {
        Self {
            client,
            max_body_bytes,
        }
    }

    pub fn from_config(
        user_agent: &UserAgentConfig,
        max_body_bytes: usize,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(user_agent)?, max_body_bytes))
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Head => self.client.head(&request.url),
        };

        let builder = request
            .headers
            .iter()
            .fold(builder.timeout(request.timeout), |b, (name, value)| {
                b.header(name.as_str(), value.as_str())
            });

        let mut response = builder.send().await.map_err(classify_reqwest_error)?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();

        let mut body = Vec::new();
        let mut truncated = false;

        let binary = headers
            .get("content-type")
            .map(|ct| is_binary_content_type(ct))
            .unwrap_or(false);

        if request.method == Method::Get && binary {
            truncated = true;
        } else if request.method == Method::Get {
            while let Some(chunk) = response.chunk().await.map_err(classify_reqwest_error)? {
                if body.len() + chunk.len() > self.max_body_bytes {
                    truncated = true;
                    break;
                }
                body.extend_from_slice(&chunk);
            }
        }

        Ok(HttpResponse {
            status,
            headers,
            body,
            final_url,
            truncated,
        })
    }
}

/// Content types whose bodies the crawler never needs to read
fn is_binary_content_type(content_type: &str) -> bool {
    let ct = content_type.to_ascii_lowercase();
    ct.starts_with("application/pdf")
        || ct.starts_with("application/octet-stream")
        || ct.starts_with("image/")
        || ct.starts_with("audio/")
        || ct.starts_with("video/")
        || ct.starts_with("application/zip")
}

fn classify_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else if error.is_builder() {
        TransportError::InvalidUrl(error.to_string())
    } else {
        TransportError::Other(error.to_string())
    }
}
