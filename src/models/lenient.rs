//! Tolerant field decoders for records produced by the generative service.
//!
//! The model is asked for a fixed shape but regularly returns numbers as
//! strings, `null` for lists, or floats for minute counts. These helpers take
//! whatever JSON value arrived and coerce it, rejecting only values that
//! cannot carry the field's meaning at all.

use serde::{de::Error, Deserialize, Deserializer};
use serde_json::Value;

/// Parses the leading run of ASCII digits, ignoring leading whitespace.
///
/// `"90+"` → 90, `"25 minutes"` → 25, `"about 10"` → `None`.
pub fn leading_number(text: &str) -> Option<u32> {
    let trimmed = text.trim_start();
    let digits: String = trimmed.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("invalid recipe id: {}", other))),
    }
}

pub fn string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(vec![s]),
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect()),
        other => Err(D::Error::custom(format!("invalid ingredient list: {}", other))),
    }
}

pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0) as usize,
        Value::String(s) => leading_number(&s).unwrap_or(0) as usize,
        _ => 0,
    })
}

pub fn minutes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .and_then(|m| u32::try_from(m).ok()),
        Value::String(s) => leading_number(&s),
        _ => None,
    })
}

pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}
