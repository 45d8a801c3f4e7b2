//! Extraction error re-export

pub use crate::infrastructure::parsing_error::{ExtractionError, ExtractionResult};
