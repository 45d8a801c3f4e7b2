//! Run-level failure
//!
//! A comparison run either produces a full result or exactly one of these. Its
//! `Display` is the single message shown to the user.

use thiserror::Error;

use crate::domain::FetchError;
use crate::infrastructure::parsing_error::ExtractionError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComparisonError {
    #[error("enter between {min} and {max} listing URLs (got {count})")]
    InvalidInput { count: usize, min: usize, max: usize },

    #[error("could not fetch source {} ({url}): {source}", .source_index + 1)]
    Fetch {
        source_index: usize,
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("could not read source {}: {source}", .source_index + 1)]
    Extraction {
        source_index: usize,
        #[source]
        source: ExtractionError,
    },
}

impl ComparisonError {
    /// Index of the source that failed, if the failure belongs to one source
    pub fn source_index(&self) -> Option<usize> {
        match self {
            Self::InvalidInput { .. } => None,
            Self::Fetch { source_index, .. } | Self::Extraction { source_index, .. } => {
                Some(*source_index)
            }
        }
    }
}
