//! Parsing configuration for listing extraction
//!
//! Selectors and field names are a contract with the target site. They live in
//! configuration so markup drift is a config change, not a code change.

use serde::{Deserialize, Serialize};

use crate::domain::PayloadShape;
use crate::infrastructure::config::defaults;

/// Main parsing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Which payload shape sources return
    pub shape: PayloadShape,

    /// Base URL for resolving relative product links
    pub base_url: String,

    /// Field layout of the JSON search endpoint
    pub json: JsonFieldConfig,

    /// Selectors for rendered listing pages
    pub html: HtmlSelectorConfig,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            shape: PayloadShape::Json,
            base_url: defaults::SITE_BASE_URL.to_string(),
            json: JsonFieldConfig::default(),
            html: HtmlSelectorConfig::default(),
        }
    }
}

/// Where product data lives inside the JSON search document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonFieldConfig {
    /// JSON pointer (RFC 6901) to the records array
    pub records_pointer: String,

    /// Key of the attribute bag inside each record
    pub attributes_key: String,

    /// Display name field
    pub name_field: String,

    /// Image field
    pub image_field: String,

    /// Detail page path field
    pub url_field: String,

    /// Identity fields, highest priority first
    pub id_fields: Vec<String>,
}

impl Default for JsonFieldConfig {
    fn default() -> Self {
        Self {
            records_pointer: "/contents/0/mainContent/0/contents/0/records".to_string(),
            attributes_key: "attributes".to_string(),
            name_field: "product.displayName".to_string(),
            image_field: "product.sku.skuImages".to_string(),
            url_field: "product.pdpURL".to_string(),
            id_fields: vec!["product.id".to_string(), "product.repositoryId".to_string()],
        }
    }
}

/// CSS selectors for rendered listing pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlSelectorConfig {
    /// Repeated product tile
    pub tile: String,

    /// Product name, relative to the tile
    pub name: String,

    /// Element carrying the raw id, relative to the tile
    pub id_element: String,

    /// Attribute on `id_element` holding the id
    pub id_attribute: String,

    /// Detail page link, relative to the tile
    pub link: String,

    /// Product image, relative to the tile
    pub image: String,

    /// Responsive image candidate list attribute on `image`
    pub image_candidates_attribute: String,

    /// Everything from this marker onward is stripped from the chosen image URL
    pub image_query_marker: String,
}

impl Default for HtmlSelectorConfig {
    fn default() -> Self {
        Self {
            tile: "#product-list div[data-testid='product-tile']".to_string(),
            name: "h3.product-tile__product-name, .product-tile__product-name".to_string(),
            id_element: "[data-productid]".to_string(),
            id_attribute: "data-productid".to_string(),
            link: "a[href]".to_string(),
            image: "img[srcset], picture source[srcset]".to_string(),
            image_candidates_attribute: "srcset".to_string(),
            image_query_marker: "?".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ParsingConfig =
            serde_json::from_str(r#"{ "shape": "html", "html": { "tile": "li.tile" } }"#).unwrap();

        assert_eq!(config.shape, PayloadShape::Html);
        assert_eq!(config.html.tile, "li.tile");
        assert_eq!(config.html.id_attribute, "data-productid");
        assert_eq!(config.json, JsonFieldConfig::default());
    }

    #[test]
    fn test_default_id_chain_order() {
        let config = JsonFieldConfig::default();
        assert_eq!(config.id_fields, vec!["product.id", "product.repositoryId"]);
    }
}
