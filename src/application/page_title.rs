//! Headings for source groups
//!
//! A search URL is titled with its decoded query terms, a browse URL with its
//! category segment. Malformed URLs fall back to the whole URL; nothing here fails.

use std::fmt;

use serde::Serialize;

const SEARCH_MARKER: &str = "search";
const SEARCH_TERMS_MARKER: &str = "search?Ntt=";
const CATEGORY_MARKER: &str = "c/";

/// Kind of listing a URL points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Search,
    Browse,
}

impl SourceKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Search => "Search",
            Self::Browse => "Browse",
        }
    }
}

/// Heading derived from a listing URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceTitle {
    pub kind: SourceKind,
    pub terms: String,
}

impl fmt::Display for SourceTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.terms)
    }
}

pub fn describe_source(url: &str) -> SourceTitle {
    if url.contains(SEARCH_MARKER) {
        let raw = url
            .split_once(SEARCH_TERMS_MARKER)
            .map_or(url, |(_, terms)| terms);
        SourceTitle {
            kind: SourceKind::Search,
            terms: decode_terms(raw),
        }
    } else {
        let terms = url
            .split_once(CATEGORY_MARKER)
            .map_or(url, |(_, rest)| rest.split('/').next().unwrap_or(rest));
        SourceTitle {
            kind: SourceKind::Browse,
            terms: terms.to_string(),
        }
    }
}

/// Only the two escapes that appear in typed search terms are decoded
fn decode_terms(raw: &str) -> String {
    raw.replace("%20", " ").replace("%27", "'")
}
