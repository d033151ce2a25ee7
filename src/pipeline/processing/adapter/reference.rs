use serde_json::{Map, Value};

/// A relational field as delivered by the record store.
///
/// Depending on the query depth the same field is either the related
/// document's id or the embedded document itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Reference<'a> {
    Unresolved(String),
    Resolved(RawDocument<'a>),
}

impl<'a> Reference<'a> {
    /// `None` for null, empty, or otherwise unusable values
    pub fn from_value(value: &'a Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self::Resolved(RawDocument::new(map))),
            Value::String(id) if !id.trim().is_empty() => Some(Self::Unresolved(id.trim().to_string())),
            Value::Number(id) => Some(Self::Unresolved(id.to_string())),
            _ => None,
        }
    }

    pub fn resolved(self) -> Option<RawDocument<'a>> {
        match self {
            Self::Resolved(doc) => Some(doc),
            Self::Unresolved(_) => None,
        }
    }

    pub fn id(&self) -> Option<String> {
        match self {
            Self::Unresolved(id) => Some(id.clone()),
            Self::Resolved(doc) => doc.id(),
        }
    }
}

/// Lenient, read-only accessors over a raw JSON document.
///
/// Every accessor answers `None` or a default for a missing or mistyped
/// field; nothing here fails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawDocument<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> RawDocument<'a> {
    pub fn new(fields: &'a Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn from_value(value: &'a Value) -> Option<Self> {
        value.as_object().map(Self::new)
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    /// Document id, accepting string or numeric ids
    pub fn id(&self) -> Option<String> {
        match self.get("id")? {
            Value::String(id) if !id.trim().is_empty() => Some(id.trim().to_string()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    /// Trimmed, non-empty string field
    pub fn str(&self, key: &str) -> Option<&'a str> {
        self.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// String field or the empty string
    pub fn string(&self, key: &str) -> String {
        self.str(key).unwrap_or_default().to_string()
    }

    pub fn opt_string(&self, key: &str) -> Option<String> {
        self.str(key).map(str::to_string)
    }

    /// Boolean field; `"true"`/`"false"` strings are accepted too
    pub fn bool(&self, key: &str) -> bool {
        match self.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Numeric field; numeric strings are accepted too
    pub fn number(&self, key: &str) -> Option<f64> {
        as_number(self.get(key)?)
    }

    pub fn nested(&self, key: &str) -> Option<RawDocument<'a>> {
        self.get(key).and_then(RawDocument::from_value)
    }

    pub fn reference(&self, key: &str) -> Option<Reference<'a>> {
        self.get(key).and_then(Reference::from_value)
    }

    pub fn array(&self, key: &str) -> &'a [Value] {
        self.get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}
