//! HTTP client for structured and document fetches
//!
//! One `reqwest` client is built per run. Every request gets a user agent
//! picked at random from the configured list and `Accept` headers matching
//! the requested representation. Requests are never retried.

#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::errors::{ExtractionError, ExtractionResult};
use crate::domain::services::page_fetcher::{FetchKind, PageFetcher};

const STRUCTURED_ACCEPT: &str = "application/json";
const DOCUMENT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.5";

/// Configuration for HTTP client behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Browser user agents; one is picked per request
    pub user_agents: Vec<String>,
    /// Whether to follow redirects
    pub follow_redirects: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agents: [
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/119.0",
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15",
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            follow_redirects: true,
        }
    }
}

/// HTTP client implementing [`PageFetcher`]
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        info!(
            "HTTP client ready (timeout {}s, {} user agents)",
            config.timeout_seconds,
            config.user_agents.len()
        );

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Random user agent from the configured list
    pub fn pick_user_agent(&self) -> Option<&str> {
        if self.config.user_agents.is_empty() {
            return None;
        }
        let index = fastrand::usize(..self.config.user_agents.len());
        Some(self.config.user_agents[index].as_str())
    }

    /// Headers for one request of the given kind
    pub fn request_headers(&self, url: &str, kind: FetchKind) -> HeaderMap {
        let mut headers = HeaderMap::new();

        let accept = match kind {
            FetchKind::Structured => STRUCTURED_ACCEPT,
            FetchKind::Document => DOCUMENT_ACCEPT,
        };
        headers.insert(ACCEPT, HeaderValue::from_static(accept));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));

        if let Some(agent) = self.pick_user_agent().and_then(|ua| HeaderValue::from_str(ua).ok()) {
            headers.insert(USER_AGENT, agent);
        }

        let referer = Url::parse(url)
            .ok()
            .filter(Url::has_host)
            .map(|u| format!("{}/", u.origin().ascii_serialization()))
            .and_then(|origin| HeaderValue::from_str(&origin).ok());
        if let Some(referer) = referer {
            headers.insert(REFERER, referer);
        }

        headers
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, url: &str, kind: FetchKind) -> ExtractionResult<String> {
        debug!("HTTP GET ({}): {}", kind, url);

        let response = self
            .client
            .get(url)
            .headers(self.request_headers(url, kind))
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    format!("request timed out after {}s", self.config.timeout_seconds)
                } else {
                    format!("request failed: {}", e)
                };
                ExtractionError::fetch(url, e.status().map(|s| s.as_u16()), message)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("HTTP error {} for {}", status, url);
            return Err(ExtractionError::fetch(
                url,
                Some(status.as_u16()),
                status.canonical_reason().unwrap_or("unexpected status"),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ExtractionError::fetch(url, Some(status.as_u16()), format!("failed to read body: {}", e)))?;

        if body.trim().is_empty() {
            return Err(ExtractionError::fetch(url, Some(status.as_u16()), "empty response body"));
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpClient::with_config(HttpClientConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_headers_follow_fetch_kind() {
        let client = HttpClient::with_config(HttpClientConfig::default()).unwrap();

        let structured = client.request_headers("https://site.com/products/abc.js", FetchKind::Structured);
        assert_eq!(structured[ACCEPT], STRUCTURED_ACCEPT);
        assert_eq!(structured[REFERER], "https://site.com/");

        let document = client.request_headers("https://site.com/products/abc", FetchKind::Document);
        assert!(document[ACCEPT].to_str().unwrap().starts_with("text/html"));
        let agent = document[USER_AGENT].to_str().unwrap();
        assert!(client.config().user_agents.iter().any(|ua| ua == agent));
    }

    #[test]
    fn test_empty_user_agent_list_sends_no_agent() {
        let config = HttpClientConfig {
            user_agents: Vec::new(),
            ..Default::default()
        };
        let client = HttpClient::with_config(config).unwrap();
        assert_eq!(client.pick_user_agent(), None);
        assert!(!client
            .request_headers("https://site.com/products/abc", FetchKind::Document)
            .contains_key(USER_AGENT));
    }
}
