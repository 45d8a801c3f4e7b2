//! Listing extraction
//!
//! Turns one source's raw payload into an ordered sequence of product records.
//! The payload shape comes from configuration; JSON documents and rendered HTML
//! each have their own parser behind a single `RecordExtractor`.

pub mod config;
pub mod context;
pub mod error;
pub mod html_listing_parser;
pub mod json_listing_parser;

pub use config::{HtmlSelectorConfig, JsonFieldConfig, ParsingConfig};
pub use context::{ExtractContext, ExtractionReport};
pub use error::{ExtractionError, ExtractionResult};
pub use html_listing_parser::{select_image_candidate, HtmlListingParser};
pub use json_listing_parser::JsonListingParser;

use scraper::Html;
use tracing::info;

use crate::domain::{PayloadShape, ProductRecord, RawPayload};

/// Parser over an already-built HTML tree with per-call context
pub trait ContextualParser {
    type Output;
    type Context;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> Self::Output;
}

/// Interpret a fetched body as the configured payload shape.
///
/// A JSON body that does not parse is fatal for the run; HTML parsing never fails.
pub fn decode_payload(
    body: String,
    shape: PayloadShape,
    source_index: usize,
) -> ExtractionResult<RawPayload> {
    match shape {
        PayloadShape::Html => Ok(RawPayload::Html(body)),
        PayloadShape::Json => serde_json::from_str(&body)
            .map(RawPayload::Json)
            .map_err(|e| ExtractionError::malformed(source_index, shape, e.to_string())),
    }
}

/// Extracts normalized product records from either payload shape
#[derive(Debug)]
pub struct RecordExtractor {
    shape: PayloadShape,
    base_url: String,
    json_parser: JsonListingParser,
    html_parser: HtmlListingParser,
}

impl RecordExtractor {
    /// Create an extractor with default selectors and field names
    pub fn new() -> ExtractionResult<Self> {
        Self::with_config(&ParsingConfig::default())
    }

    /// Compile the configured selectors once for the lifetime of the extractor
    pub fn with_config(config: &ParsingConfig) -> ExtractionResult<Self> {
        Ok(Self {
            shape: config.shape,
            base_url: config.base_url.clone(),
            json_parser: JsonListingParser::with_config(&config.json),
            html_parser: HtmlListingParser::with_config(&config.html)?,
        })
    }

    pub fn shape(&self) -> PayloadShape {
        self.shape
    }

    /// Extract the records of one source, in payload order
    pub fn extract(
        &self,
        payload: &RawPayload,
        source_index: usize,
    ) -> ExtractionResult<Vec<ProductRecord>> {
        self.extract_report(payload, source_index)
            .map(|report| report.records)
    }

    /// Extract and also report how many records were skipped
    pub fn extract_report(
        &self,
        payload: &RawPayload,
        source_index: usize,
    ) -> ExtractionResult<ExtractionReport> {
        if payload.shape() != self.shape {
            return Err(ExtractionError::ShapeMismatch {
                expected: self.shape,
                found: payload.shape(),
            });
        }

        let context = ExtractContext::new(source_index, self.base_url.clone());
        let report = match payload {
            RawPayload::Json(document) => self.json_parser.parse(document, &context),
            RawPayload::Html(markup) => self.html_parser.parse(markup, &context),
        };

        info!(
            "Source {}: {} records extracted, {} skipped",
            source_index,
            report.records.len(),
            report.skipped
        );
        Ok(report)
    }
}
