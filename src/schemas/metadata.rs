//! Narrow accessors over free-form metadata documents
//!
//! The metadata schema is open-ended; rules only ever read a handful of named
//! fields, so the document stays an untyped `serde_json::Value`.

use serde_json::{Map, Value};

/// A parsed metadata document (always a JSON object)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Metadata {
    fields: Map<String, Value>,
}

impl Metadata {
    /// Parse a raw document.
    ///
    /// A missing or blank document is an empty object. Anything that is not a
    /// JSON object is reported with a diagnostic suitable for a failure reason.
    pub fn parse(raw: Option<&str>) -> Result<Self, String> {
        let raw = match raw {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(Metadata::default()),
        };

        let value = serde_json::from_str::<Value>(raw)
            .map_err(|e| format!("metadata is not valid JSON: {}", e))?;
        Metadata::from_value(value)
    }

    /// Wrap an already-parsed value
    pub fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Object(fields) => Ok(Metadata { fields }),
            other => Err(format!(
                "metadata must be a JSON object, found {}",
                json_type_name(&other)
            )),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Raw field access
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// A nested object field
    pub fn object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.get(key).and_then(Value::as_object)
    }

    /// A list field with at least one element
    pub fn non_empty_list(&self, key: &str) -> Option<&Vec<Value>> {
        self.get(key)
            .and_then(Value::as_array)
            .filter(|items| !items.is_empty())
    }

    /// True only for a literal `true`
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some(Value::Bool(true)))
    }

    /// A numeric field; numeric strings are accepted
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(as_number)
    }

    /// Whether a field carries content: non-blank text, a non-empty list or
    /// object, a number or a boolean.
    pub fn has_content(&self, key: &str) -> bool {
        self.get(key).is_some_and(value_has_content)
    }
}

/// Content test shared with nested-object checks
pub fn value_has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Read a number from a JSON number or numeric string
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_missing_and_blank() {
        assert!(Metadata::parse(None).unwrap().is_empty());
        assert!(Metadata::parse(Some("   ")).unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        let err = Metadata::parse(Some("[1, 2]")).unwrap_err();
        assert!(err.contains("an array"));

        let err = Metadata::parse(Some("{ not json")).unwrap_err();
        assert!(err.contains("not valid JSON"));
    }

    #[test]
    fn test_accessors() {
        let meta = Metadata::parse(Some(
            r#"{
                "acceptance_criteria": [{"text": "works", "met": true}],
                "empty": [],
                "fix_verified": true,
                "tests_passing": "true",
                "coverage_percentage": "85.5",
                "notes": "  ",
                "ownership": {"responsible": "alice"}
            }"#,
        ))
        .unwrap();

        assert_eq!(meta.non_empty_list("acceptance_criteria").map(Vec::len), Some(1));
        assert!(meta.non_empty_list("empty").is_none());
        assert!(meta.flag("fix_verified"));
        assert!(!meta.flag("tests_passing"));
        assert_eq!(meta.number("coverage_percentage"), Some(85.5));
        assert!(!meta.has_content("notes"));
        assert!(meta.has_content("ownership"));
        assert!(meta.object("ownership").is_some());
        assert!(!meta.has_content("missing"));
    }
}
