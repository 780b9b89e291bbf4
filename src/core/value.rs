//! Coercion helpers for dynamic form values

use serde_json::Value;

/// Render a value as the text a filter operates on
///
/// Strings are returned as is, numbers use their JSON text, booleans become
/// `"true"`/`"false"`, `null` becomes the empty string and arrays/objects
/// are rendered as compact JSON.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Whether an optional field should be treated as not filled in
///
/// Empty strings, `null`, empty arrays and empty objects are empty. `"0"`
/// and `0` are not.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
