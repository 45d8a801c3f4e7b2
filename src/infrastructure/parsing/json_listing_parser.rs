//! Product extraction from the JSON search endpoint
//!
//! The endpoint nests the records array several levels deep and each record's
//! attribute bag has inconsistent key presence. Missing structure degrades to an
//! empty result; only the identity chain decides whether a record is kept.

use serde_json::Value;
use tracing::{debug, warn};

use super::config::JsonFieldConfig;
use super::context::{ExtractContext, ExtractionReport};
use crate::domain::identity::{first_text, IdentityResolver};
use crate::domain::ProductRecord;

/// Parser for JSON listing documents
#[derive(Debug, Clone)]
pub struct JsonListingParser {
    fields: JsonFieldConfig,
    identity: IdentityResolver,
}

impl JsonListingParser {
    pub fn with_config(fields: &JsonFieldConfig) -> Self {
        Self {
            fields: fields.clone(),
            identity: IdentityResolver::new(fields.id_fields.iter().cloned()),
        }
    }

    /// Extract records from one JSON document, in payload order
    pub fn parse(&self, document: &Value, context: &ExtractContext) -> ExtractionReport {
        let Some(records) = document
            .pointer(&self.fields.records_pointer)
            .and_then(Value::as_array)
        else {
            warn!(
                "No records array at '{}' for source {}; treating as empty",
                self.fields.records_pointer, context.source_index
            );
            return ExtractionReport::empty();
        };

        let mut report = ExtractionReport::empty();
        for (index, record) in records.iter().enumerate() {
            match self.extract_record(record, context) {
                Some(product) => report.records.push(product),
                None => {
                    debug!(
                        "Skipping record {} of source {}: no usable id",
                        index, context.source_index
                    );
                    report.skipped += 1;
                }
            }
        }

        debug!(
            "Extracted {} records from source {} ({} skipped)",
            report.records.len(),
            context.source_index,
            report.skipped
        );
        report
    }

    fn extract_record(&self, record: &Value, context: &ExtractContext) -> Option<ProductRecord> {
        let attributes = record.get(&self.fields.attributes_key)?;
        let id = self.identity.resolve(attributes)?;

        let name = field_text(attributes, &self.fields.name_field);
        let image_url = field_text(attributes, &self.fields.image_field);
        let url = context.resolve_url(&field_text(attributes, &self.fields.url_field));

        Some(
            ProductRecord::new(context.source_index, id)
                .with_name(name)
                .with_image_url(image_url)
                .with_url(url),
        )
    }
}

/// First element of an array-valued field, or empty when absent
fn field_text(attributes: &Value, field: &str) -> String {
    attributes
        .get(field)
        .and_then(first_text)
        .unwrap_or_default()
        .to_string()
}
