//! Scraper module for fetching page bodies from the target site
//!
//! This module provides the HTTP transport used by the provider. Requests are
//! plain GETs with the client's default headers; failures are returned
//! immediately without retrying.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

/// Errors that can occur during fetch operations
#[derive(Error, Debug)]
pub enum ScraperError {
    /// Network-related errors (connection timeout, DNS failure, etc.)
    #[error("Failed to connect to server: {0}")]
    NetworkError(String),

    /// HTTP non-2xx status code errors
    #[error("Server returned status {0}")]
    HttpError(u16),

    /// Error reading response body
    #[error("Failed to read response body: {0}")]
    ResponseError(String),

    /// The underlying HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// Result of a successful page fetch
#[derive(Debug, Clone)]
pub struct ScraperResult {
    /// The response body (HTML or JSON)
    pub body: String,
    /// The HTTP status code
    pub status: u16,
}

/// Transport settings
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Whole-request timeout
    pub request_timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Anything able to GET a URL and hand back its body
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch the given URL
    async fn get(&self, url: &str) -> Result<ScraperResult, ScraperError>;
}

/// HTTP client for fetching pages
pub struct Scraper {
    client: Client,
}

impl Scraper {
    /// Create a new Scraper with custom configuration
    pub fn with_config(config: ScraperConfig) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ScraperError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }

    /// Fetch a page from the given URL
    pub async fn fetch_page(&self, url: &str) -> Result<ScraperResult, ScraperError> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ScraperError::NetworkError("Connection timeout".to_string())
            } else if e.is_connect() {
                ScraperError::NetworkError("Failed to connect to server".to_string())
            } else {
                ScraperError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::HttpError(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScraperError::ResponseError(e.to_string()))?;

        Ok(ScraperResult {
            body,
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl Fetch for Scraper {
    async fn get(&self, url: &str) -> Result<ScraperResult, ScraperError> {
        self.fetch_page(url).await
    }
}
