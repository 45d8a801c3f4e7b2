//! Extraction context
//!
//! Carries per-source information through one extraction call.

use url::Url;

use crate::domain::ProductRecord;

/// Context information for extracting one source's payload
#[derive(Debug, Clone)]
pub struct ExtractContext {
    /// Position of the source in the input list
    pub source_index: usize,

    /// Base URL for resolving relative links
    pub base_url: String,
}

impl ExtractContext {
    pub fn new(source_index: usize, base_url: impl Into<String>) -> Self {
        Self {
            source_index,
            base_url: base_url.into(),
        }
    }

    /// Resolve a product link against the base URL.
    ///
    /// Best-effort: a link that cannot be joined is returned trimmed but unchanged.
    pub fn resolve_url(&self, href: &str) -> String {
        let href = href.trim();
        if href.is_empty() {
            return String::new();
        }
        if href.starts_with("http://") || href.starts_with("https://") {
            return href.to_string();
        }

        match Url::parse(&self.base_url).and_then(|base| base.join(href)) {
            Ok(url) => url.to_string(),
            Err(e) => {
                tracing::debug!("Could not resolve '{}' against '{}': {}", href, self.base_url, e);
                href.to_string()
            }
        }
    }
}

/// Tally of what one extraction kept and dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    pub records: Vec<ProductRecord>,
    pub skipped: usize,
}

impl ExtractionReport {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
        }
    }
}
