//! Page fetching and outcome classification
//!
//! The crawl engine depends on the [`PageFetcher`] trait only: given a URL,
//! produce a classified [`FetchOutcome`]. The production implementation
//! fetches over HTTP and extracts absolute hyperlinks; tests substitute an
//! in-memory fetcher.

use crate::config::UserAgentConfig;
use crate::crawler::parser::extract_links;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Classified result of processing one crawl job
///
/// A fetcher produces only the first four variants; the engine's admission
/// and scope gates produce the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Page fetched; carries the ordered absolute hyperlink URLs it contains
    Links(Vec<String>),

    /// Server responded 429
    RateLimited,

    /// Server responded with a non-success status other than 429
    ServerError { status: u16 },

    /// Connection, timeout, or body-read failure
    NetworkError { cause: String },

    /// Blocked by the domain's robots policy
    Disallowed,

    /// URL was already admitted for fetching in this session
    AlreadyVisited,

    /// Job depth is past the session's depth bound
    DepthExceeded,

    /// URL is outside the session's target domain
    OffDomain,
}

/// The injected fetch-and-extract capability
///
/// Implementations fetch a page and return the absolute hyperlink URLs it
/// contains, or a classified failure. How the content is retrieved and
/// parsed is entirely the implementation's concern.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchOutcome;
}

/// HTTP fetcher backed by a shared reqwest client
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                let cause = if e.is_timeout() {
                    "request timeout".to_string()
                } else if e.is_connect() {
                    "connection failed".to_string()
                } else {
                    e.to_string()
                };
                return FetchOutcome::NetworkError { cause };
            }
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return FetchOutcome::RateLimited;
        }
        if !status.is_success() {
            return FetchOutcome::ServerError {
                status: status.as_u16(),
            };
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        // Non-HTML pages are terminal: fetched fine, nothing to follow.
        if !content_type.is_empty() && !content_type.contains("text/html") {
            return FetchOutcome::Links(Vec::new());
        }

        // Links resolve against the final URL so redirected pages expand
        // correctly.
        let final_url = response.url().clone();
        match response.text().await {
            Ok(body) => FetchOutcome::Links(extract_links(&body, &final_url)),
            Err(e) => FetchOutcome::NetworkError {
                cause: e.to_string(),
            },
        }
    }
}

/// Builds the HTTP client shared by the fetcher and the robots cache
///
/// The user agent identifies the crawler and its operator:
/// `name/version (+contact-url; contact-email)`.
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}
