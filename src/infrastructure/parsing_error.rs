//! Extraction error types
//!
//! Only failures that make a whole payload unusable are errors. A record missing
//! its id, or a tile missing its name or id element, is skipped and never reaches
//! this type.

use thiserror::Error;

use crate::domain::PayloadShape;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("payload for source {source_index} is not valid {shape}: {reason}")]
    MalformedPayload {
        source_index: usize,
        shape: PayloadShape,
        reason: String,
    },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("expected a {expected} payload but the extractor was given {found}")]
    ShapeMismatch {
        expected: PayloadShape,
        found: PayloadShape,
    },
}

impl ExtractionError {
    pub fn malformed(source_index: usize, shape: PayloadShape, reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            source_index,
            shape,
            reason: reason.into(),
        }
    }

    pub fn invalid_selector(selector: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether fixing the configuration (rather than the target site) resolves this
    pub fn is_configuration_error(&self) -> bool {
        match self {
            Self::InvalidSelector { .. } | Self::ShapeMismatch { .. } => true,
            Self::MalformedPayload { .. } => false,
        }
    }
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;
