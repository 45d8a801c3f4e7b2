//! Domain services
//!
//! Seams to collaborators outside the comparison core.

use async_trait::async_trait;
use thiserror::Error;

/// Failure to obtain a raw page for one source
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request to {url} failed with status {status}")]
    Status { status: u16, url: String },

    #[error("timed out waiting for {url}")]
    Timeout { url: String },

    #[error("could not reach {url}: {message}")]
    Transport { url: String, message: String },

    #[error("could not read response body from {url}: {message}")]
    Body { url: String, message: String },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. }
            | Self::Timeout { url }
            | Self::Transport { url, .. }
            | Self::Body { url, .. } => url,
        }
    }
}

/// Yields the raw page body for a fully-suffixed listing URL.
///
/// Implementations may use a plain HTTP request or a rendering browser; either way
/// the body comes back as text and the caller interprets it per the configured shape.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
