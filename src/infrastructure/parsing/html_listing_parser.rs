//! Product extraction from rendered listing pages
//!
//! One selector finds the repeated product tiles; sub-selectors pull the name, the
//! raw id attribute, the detail link and the image out of each tile. A tile without
//! a name or id element is skipped, never fatal.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::config::HtmlSelectorConfig;
use super::context::{ExtractContext, ExtractionReport};
use super::{ContextualParser, ExtractionError, ExtractionResult};
use crate::domain::identity::resolve_candidates;
use crate::domain::ProductRecord;

lazy_static! {
    /// Candidates in a responsive image list are separated by a comma and whitespace;
    /// a bare comma may appear inside a candidate URL.
    static ref CANDIDATE_SEPARATOR: Regex = Regex::new(r",\s+").expect("static regex");
}

/// Parser for extracting product tiles from listing HTML
#[derive(Debug)]
pub struct HtmlListingParser {
    tile_selector: Selector,
    name_selector: Selector,
    id_selector: Selector,
    link_selector: Selector,
    image_selector: Selector,
    id_attribute: String,
    image_candidates_attribute: String,
    image_query_marker: String,
}

impl HtmlListingParser {
    /// Create parser with custom selector configuration
    pub fn with_config(selectors: &HtmlSelectorConfig) -> ExtractionResult<Self> {
        Ok(Self {
            tile_selector: compile_selector(&selectors.tile)?,
            name_selector: compile_selector(&selectors.name)?,
            id_selector: compile_selector(&selectors.id_element)?,
            link_selector: compile_selector(&selectors.link)?,
            image_selector: compile_selector(&selectors.image)?,
            id_attribute: selectors.id_attribute.clone(),
            image_candidates_attribute: selectors.image_candidates_attribute.clone(),
            image_query_marker: selectors.image_query_marker.clone(),
        })
    }

    /// Parse a markup string and extract its tiles
    pub fn parse(&self, markup: &str, context: &ExtractContext) -> ExtractionReport {
        // The payload may be a full document or the inner markup of the listing
        // container; html5ever accepts either.
        let document = Html::parse_document(markup);
        self.parse_with_context(&document, context)
    }

    fn extract_tile(&self, tile: &ElementRef, context: &ExtractContext) -> Option<ProductRecord> {
        let name = tile
            .select(&self.name_selector)
            .next()
            .map(|e| e.text().collect::<String>().trim().to_string())?;

        // The tile itself may carry the id; otherwise the first usable descendant
        let id = resolve_candidates([tile.value().attr(&self.id_attribute)]).or_else(|| {
            tile.select(&self.id_selector)
                .find_map(|e| resolve_candidates([e.value().attr(&self.id_attribute)]))
        })?;

        let url = tile
            .select(&self.link_selector)
            .find_map(|e| e.value().attr("href"))
            .map(|href| context.resolve_url(href))
            .unwrap_or_default();

        let image_url = tile
            .select(&self.image_selector)
            .find_map(|e| e.value().attr(&self.image_candidates_attribute))
            .and_then(|candidates| select_image_candidate(candidates, &self.image_query_marker))
            .unwrap_or_default();

        Some(
            ProductRecord::new(context.source_index, id)
                .with_name(name)
                .with_image_url(image_url)
                .with_url(url),
        )
    }
}

impl ContextualParser for HtmlListingParser {
    type Output = ExtractionReport;
    type Context = ExtractContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> Self::Output {
        let mut report = ExtractionReport::empty();

        for (index, tile) in html.select(&self.tile_selector).enumerate() {
            match self.extract_tile(&tile, context) {
                Some(record) => report.records.push(record),
                None => {
                    debug!(
                        "Skipping tile {} of source {}: missing name or id",
                        index, context.source_index
                    );
                    report.skipped += 1;
                }
            }
        }

        debug!(
            "Extracted {} tiles from source {} ({} skipped)",
            report.records.len(),
            context.source_index,
            report.skipped
        );
        report
    }
}

fn compile_selector(selector: &str) -> ExtractionResult<Selector> {
    Selector::parse(selector).map_err(|e| ExtractionError::invalid_selector(selector, e.to_string()))
}

/// Pick the highest-resolution URL from a responsive image candidate list.
///
/// The list is ordered smallest to largest, so the last candidate wins. Its
/// width/density descriptor is dropped and everything from `query_marker` onward
/// is stripped.
pub fn select_image_candidate(candidates: &str, query_marker: &str) -> Option<String> {
    let last = CANDIDATE_SEPARATOR
        .split(candidates.trim())
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .last()?;

    let url = last.split_whitespace().next()?;
    let url = match url.find(query_marker) {
        Some(pos) if !query_marker.is_empty() => &url[..pos],
        _ => url,
    };

    let url = url.trim_end_matches(',');
    (!url.is_empty()).then(|| url.to_string())
}
