//! Scripted HTTP client for unit tests

use crate::crawler::{HttpClient, HttpRequest, HttpResponse, Method, TransportError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Clone)]
enum Scripted {
    Response(HttpResponse),
    Failure(TransportError),
}

/// Answers requests from a fixed table and records every request made
///
/// Unknown URLs get a 404.
#[derive(Default)]
pub struct ScriptedHttpClient {
    routes: HashMap<String, Scripted>,
    log: Mutex<Vec<(Method, String)>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, status: u16, content_type: &str, body: &str) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), content_type.to_string());
        self.routes.insert(
            url.to_string(),
            Scripted::Response(HttpResponse {
                status,
                headers,
                body: body.as_bytes().to_vec(),
                final_url: url.to_string(),
                truncated: false,
            }),
        );
        self
    }

    pub fn html(self, url: &str, body: &str) -> Self {
        self.respond(url, 200, "text/html; charset=utf-8", body)
    }

    pub fn pdf(mut self, url: &str, size: u64) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/pdf".to_string());
        headers.insert("content-length".to_string(), size.to_string());
        self.routes.insert(
            url.to_string(),
            Scripted::Response(HttpResponse {
                status: 200,
                headers,
                body: Vec::new(),
                final_url: url.to_string(),
                truncated: true,
            }),
        );
        self
    }

    pub fn redirect(mut self, url: &str, final_url: &str, body: &str) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "text/html".to_string());
        self.routes.insert(
            url.to_string(),
            Scripted::Response(HttpResponse {
                status: 200,
                headers,
                body: body.as_bytes().to_vec(),
                final_url: final_url.to_string(),
                truncated: false,
            }),
        );
        self
    }

    pub fn fail(mut self, url: &str, error: TransportError) -> Self {
        self.routes.insert(url.to_string(), Scripted::Failure(error));
        self
    }

    pub fn requests(&self) -> Vec<(Method, String)> {
        self.log.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, url: &str) -> usize {
        self.requests()
            .iter()
            .filter(|(m, u)| *m == method && u == url)
            .count()
    }
}

#[async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.log
            .lock()
            .unwrap()
            .push((request.method, request.url.clone()));

        match self.routes.get(&request.url) {
            Some(Scripted::Response(response)) => {
                let mut response = response.clone();
                if request.method == Method::Head {
                    response.body.clear();
                }
                Ok(response)
            }
            Some(Scripted::Failure(error)) => Err(error.clone()),
            None => Ok(HttpResponse {
                status: 404,
                final_url: request.url,
                ..HttpResponse::default()
            }),
        }
    }
}
