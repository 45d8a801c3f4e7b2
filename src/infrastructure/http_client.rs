//! HTTP page fetcher
//!
//! Plain `reqwest` client behind the `PageFetcher` seam. The listing endpoint
//! answers a browser-like request directly, so no rendering engine is needed
//! for the JSON shape.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{redirect, Client};
use tracing::{debug, info, warn};

use crate::domain::{FetchError, PageFetcher};
use crate::infrastructure::config::FetchConfig;

/// HTTP client that fetches listing pages
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: FetchConfig,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: FetchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language).context("Invalid Accept-Language")?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .redirect(if config.follow_redirects {
                redirect::Policy::limited(10)
            } else {
                redirect::Policy::none()
            })
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// Create a client with default settings
    pub fn with_defaults() -> Result<Self> {
        Self::new(FetchConfig::default())
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        info!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| map_send_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("HTTP {} from {}", status, url);
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        debug!("Fetched {} bytes from {} ({})", body.len(), url, status);
        Ok(body)
    }
}

fn map_send_error(url: &str, error: &reqwest::Error) -> FetchError {
    if error.is_timeout() {
        warn!("Timed out fetching {}", url);
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        warn!("Request to {} failed: {}", url, error);
        FetchError::Transport {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
