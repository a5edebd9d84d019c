//! Lenient deserializers for loosely-typed backend payloads
//!
//! The backend assembles its responses from LLM output and third-party APIs, so
//! any field may be missing, null, or the wrong type. These helpers degrade a bad
//! field to its default (or drop a bad list element) instead of failing the whole
//! payload.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

/// Deserialize a field, falling back to `Default` on null or a type mismatch
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        debug!(error = %e, "or_default: field did not match, using default");
        T::default()
    }))
}

/// Deserialize a list, keeping only the elements that parse
///
/// A non-array value yields an empty list.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| {
                serde_json::from_value(item)
                    .map_err(|e| debug!(error = %e, "list: skipping element"))
                    .ok()
            })
            .collect()),
        Value::Null => Ok(Vec::new()),
        other => {
            debug!(?other, "list: expected array, using empty list");
            Ok(Vec::new())
        }
    }
}

/// Deserialize a field that only counts as present when it is a JSON object
///
/// `{}` is present. Null, strings, numbers and arrays are absent.
pub fn object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        debug!(?value, "object: not an object, treating as absent");
        return Ok(None);
    }
    Ok(serde_json::from_value(value)
        .map_err(|e| debug!(error = %e, "object: failed to parse"))
        .ok())
}

/// Deserialize display text, coercing scalars to their string form
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Deserialize a coordinate; anything unusable becomes NaN
pub fn coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    })
}

/// Default for a missing coordinate
pub fn nan() -> f64 {
    f64::NAN
}
