//! Typed reads from the untyped attribute maps of nodes and marks.
//!
//! The editor stores absent attributes as either missing keys or `null`, and
//! empty strings mean "unset"; every accessor here treats all three alike.

use serde_json::{Map, Value};

use crate::pandoc::Attr;

pub type Attrs = Map<String, Value>;

/// Non-empty string attribute.
pub fn string<'a>(attrs: &'a Attrs, key: &str) -> Option<&'a str> {
    attrs
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

pub fn integer(attrs: &Attrs, key: &str) -> Option<i64> {
    match attrs.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Integer attribute saturated to the `i32` range.
pub fn int32(attrs: &Attrs, key: &str) -> Option<i32> {
    integer(attrs, key).map(|n| i32::try_from(n).unwrap_or(if n < 0 { i32::MIN } else { i32::MAX }))
}

pub fn number(attrs: &Attrs, key: &str) -> Option<f64> {
    match attrs.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn boolean(attrs: &Attrs, key: &str) -> Option<bool> {
    attrs.get(key).and_then(Value::as_bool)
}

/// `classes` as an array of strings or a whitespace-separated string.
pub fn classes(attrs: &Attrs) -> Vec<String> {
    match attrs.get("classes") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) => s.split_whitespace().map(str::to_string).collect(),
        _ => vec![],
    }
}

/// `attributes` object as ordered key/value pairs; non-string values are
/// written as JSON.
pub fn key_values(attrs: &Attrs) -> Vec<(String, String)> {
    let Some(Value::Object(map)) = attrs.get("attributes") else {
        return vec![];
    };
    map.iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| {
            let value = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.clone(), value)
        })
        .collect()
}

/// Builds a Pandoc `Attr` from the conventional `id`/`classes`/`attributes`.
pub fn pandoc_attr(attrs: &Attrs) -> Attr {
    Attr::new(
        string(attrs, "id").unwrap_or_default(),
        classes(attrs),
        key_values(attrs),
    )
}

pub fn has_id(attrs: &Attrs) -> bool {
    string(attrs, "id").is_some()
}
