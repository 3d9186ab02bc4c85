//! Field deserializers for server and script supplied options.
//!
//! Each one accepts any JSON value and maps the unusable ones to `None`, so a
//! bad field costs that field alone rather than the whole options object.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Record id as it appears in URLs. Numbers and numeric or slug strings are
/// accepted: `4`, `"4"`, `"a1-b2"`.
pub fn id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(id_from_value(&Value::deserialize(deserializer)?))
}

pub fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n.to_string()),
        Value::String(s) => id_from_text(s),
        Value::Null => None,
        other => {
            tracing::warn!("ignoring id {}", other);
            None
        }
    }
}

pub fn id_from_text(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if text
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        Some(text.to_string())
    } else {
        tracing::warn!("ignoring id {:?}", text);
        None
    }
}

pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::String(_) | Value::Null => None,
        other => {
            tracing::warn!("ignoring non-text option {}", other);
            None
        }
    })
}

/// CSS pixel width: `300`, `"300"` or `"300px"`.
pub fn pixels<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(pixels_from_value(&Value::deserialize(deserializer)?))
}

fn pixels_from_value(value: &Value) -> Option<u32> {
    let parsed = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64)),
        Value::String(s) => {
            let s = s.trim();
            s.strip_suffix("px").unwrap_or(s).trim().parse::<u64>().ok()
        }
        _ => None,
    };
    let width = parsed.and_then(|n| u32::try_from(n).ok());
    if width.is_none() && !value.is_null() {
        tracing::warn!("ignoring width {}", value);
    }
    width
}
