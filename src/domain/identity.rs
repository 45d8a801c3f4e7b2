//! Identity key resolution
//!
//! The upstream catalogue omits the primary id on some record types, so the id is
//! taken from an ordered chain of candidate fields. The first candidate that is
//! present and non-blank after trimming wins.

use serde_json::Value;

/// Resolves a stable identity key from an ordered chain of candidate fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityResolver {
    fields: Vec<String>,
}

impl IdentityResolver {
    /// Create a resolver over the given field chain, highest priority first
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Resolve the id of one JSON attribute bag.
    ///
    /// Returns `None` when no field in the chain yields a usable value; the caller
    /// drops the record.
    pub fn resolve(&self, attributes: &Value) -> Option<String> {
        self.fields
            .iter()
            .find_map(|field| attributes.get(field).and_then(first_text).and_then(normalize))
    }
}

/// Resolve from already-extracted candidate values, first usable one wins
pub fn resolve_candidates<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates.into_iter().flatten().find_map(normalize)
}

/// Text of a field that may be a scalar or an array of scalars (first element used)
pub fn first_text(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        Value::Array(items) => items.first().and_then(Value::as_str),
        _ => None,
    }
}

fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
