use serde::{Deserialize, Serialize};

/// One user-entered listing URL, identified by its position in the input list.
///
/// Position 0 is the reference source; every other position is a comparison source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub index: usize,
    pub url: String,
}

impl Source {
    pub fn new(index: usize, url: impl Into<String>) -> Self {
        Self {
            index,
            url: url.into(),
        }
    }

    pub fn is_reference(&self) -> bool {
        self.index == 0
    }
}

/// Normalized product extracted from a listing payload.
///
/// `id` is always non-empty; records that cannot resolve an identity are dropped
/// during extraction instead of being carried with a blank id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub source_index: usize,
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub url: String,
}

impl ProductRecord {
    pub fn new(source_index: usize, id: impl Into<String>) -> Self {
        Self {
            source_index,
            id: id.into(),
            name: String::new(),
            image_url: String::new(),
            url: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

/// Shape of the raw payload a source returns.
///
/// Chosen by configuration; payloads are never sniffed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadShape {
    /// JSON search endpoint document with a nested records array
    #[default]
    Json,
    /// Rendered HTML containing repeated product tiles
    Html,
}

impl PayloadShape {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Html => "html",
        }
    }
}

impl std::fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PayloadShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "html" => Ok(Self::Html),
            other => Err(format!("unknown payload shape '{other}' (expected json or html)")),
        }
    }
}

/// Raw page content for one source, already interpreted as its configured shape.
#[derive(Debug, Clone)]
pub enum RawPayload {
    Html(String),
    Json(serde_json::Value),
}

impl RawPayload {
    pub fn shape(&self) -> PayloadShape {
        match self {
            Self::Html(_) => PayloadShape::Html,
            Self::Json(_) => PayloadShape::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_camel_case() {
        let record = ProductRecord::new(1, "prod123")
            .with_name("Align Pant")
            .with_image_url("https://images.example.com/a.jpg")
            .with_url("https://shop.example.com/p/align");

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["sourceIndex"], 1);
        assert_eq!(value["imageUrl"], "https://images.example.com/a.jpg");
        assert_eq!(value["id"], "prod123");
    }

    #[test]
    fn test_payload_shape_parsing() {
        assert_eq!("JSON".parse::<PayloadShape>().unwrap(), PayloadShape::Json);
        assert_eq!(" html ".parse::<PayloadShape>().unwrap(), PayloadShape::Html);
        assert!("xml".parse::<PayloadShape>().is_err());
    }

    #[test]
    fn test_reference_source() {
        assert!(Source::new(0, "https://a").is_reference());
        assert!(!Source::new(2, "https://b").is_reference());
    }
}
