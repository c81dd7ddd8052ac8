//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client (user agent, timeouts, session cookies)
//! - Capture: GET, parse, write the page text artifact
//! - Verification: GET, report status code and payload size
//! - Sitemap document retrieval
//! - Error classification (`Transient` vs `Fatal`)
//!
//! Pages are not rendered, so no screenshot is produced; the screenshot
//! path is still recorded in the site map for a rendering backend to fill.

use crate::artifacts::ArtifactPaths;
use crate::config::{CrawlerConfig, HttpConfig};
use crate::crawler::adapter::{CaptureResult, FetchAdapter, SitemapSource, Verification};
use crate::crawler::parser::parse_html;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, SET_COOKIE};
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};

/// Builds an HTTP client with proper configuration
///
/// Every configured `name=value` cookie is sent with every request.
///
/// # Example
///
/// ```no_run
/// use site_cartographer::config::HttpConfig;
/// use site_cartographer::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    if !config.cookies.is_empty() {
        let cookie_header = config.cookies.join("; ");
        match HeaderValue::from_str(&cookie_header) {
            Ok(value) => {
                headers.insert(COOKIE, value);
            }
            Err(e) => tracing::warn!("Ignoring configured cookies: {}", e),
        }
    }

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.page_load_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetch adapter backed by plain HTTP requests
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    viewport_width: u32,
    viewport_height: u32,
}

impl HttpFetcher {
    pub fn new(client: Client, viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            client,
            viewport_width,
            viewport_height,
        }
    }

    pub fn from_config(http: &HttpConfig, crawler: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            build_http_client(http)?,
            crawler.viewport_width,
            crawler.viewport_height,
        ))
    }
}

#[async_trait]
impl FetchAdapter for HttpFetcher {
    async fn capture(&self, url: &str, paths: &ArtifactPaths) -> Result<CaptureResult, FetchError> {
        let started = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::fatal(url, e.to_string()))?;

        // Links resolve against where redirects ended up
        let base_url = response.url().clone();

        let mut degraded = false;
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Partial load of {}: {}", url, e);
                degraded = true;
                String::new()
            }
        };
        let load_time_ms = started.elapsed().as_millis() as u64;

        // Html is !Send, so parsing stays out of the async state
        let parsed = parse_html(&body, &base_url);

        if let Err(e) = tokio::fs::write(&paths.text, parsed.text.as_bytes()).await {
            tracing::warn!("Failed to write {}: {}", paths.text.display(), e);
            degraded = true;
        }
        tracing::debug!(
            "No renderer available, skipping screenshot {}",
            paths.screenshot.display()
        );

        Ok(CaptureResult {
            links: parsed.links,
            load_time_ms,
            width: self.viewport_width,
            height: self.viewport_height,
            degraded,
        })
    }

    async fn verify(&self, url: &str) -> Result<Verification, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, &e))?;

        for cookie in response.headers().get_all(SET_COOKIE) {
            if let Ok(cookie) = cookie.to_str() {
                tracing::debug!("Cookie set by {}: {}", url, cookie);
            }
        }

        let status_code = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(url, &e))?;

        Ok(Verification {
            status_code,
            size_bytes: body.len() as u64,
        })
    }
}

#[async_trait]
impl SitemapSource for HttpFetcher {
    async fn fetch_sitemap(&self, url: &str) -> Result<Option<String>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, &e))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::info!("No sitemap at {} (HTTP {})", url, status.as_u16());
            return Ok(None);
        }

        response
            .text()
            .await
            .map(Some)
            .map_err(|e| FetchError::from_reqwest(url, &e))
    }
}
