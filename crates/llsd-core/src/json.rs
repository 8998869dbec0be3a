//! # JSON Adapter — `application/llsd+json`
//!
//! A thin walk between [`Value`] and `serde_json::Value`. JSON has no room
//! for several LLSD kinds, so they travel as strings and come back as
//! strings:
//!
//! - UUID, date, URI: their canonical text.
//! - Binary: base64.
//! - NaN, the infinities, and negative zero: the real-literal tokens
//!   (`NaNS`, `+Infinity`, `-Infinity`, `-Zero`).
//! - Undefined: `null`.
//!
//! Readers recover the original kinds through the `as_*` conversions. On the
//! way in, integral numbers within the 32-bit range become Integer and all
//! other numbers become Real. Object members arrive sorted by key.

use serde_json::Number;

use crate::config::CodecConfig;
use crate::convert::Coerce;
use crate::error::{LlsdError, Result};
use crate::real::{format_real, is_negative_zero};
use crate::value::{Map, Value};

/// MIME type of the JSON serialization.
pub const JSON_MIME_TYPE: &str = "application/llsd+json";

/// Convert a value to a JSON tree.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Undefined => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Integer(n) => serde_json::Value::from(*n),
        Value::Real(f) if is_negative_zero(*f) => serde_json::Value::String(format_real(*f)),
        Value::Real(f) => Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or_else(|| serde_json::Value::String(format_real(*f))),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Uuid(_) | Value::Date(_) | Value::Uri(_) | Value::Binary(_) => {
            serde_json::Value::String(value.as_string())
        }
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Map(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| (k.to_string(), to_json(v)))
                .collect(),
        ),
    }
}

/// Serialize a value to JSON text.
///
/// # Errors
///
/// Returns [`LlsdError::Json`] if serialization fails.
pub fn to_json_string(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(&to_json(value))?)
}

/// Convert a JSON tree to a value with the default [`CodecConfig`].
///
/// Object members are read in the order `serde_json` stores them, which is
/// sorted by key rather than document order. LLSD map equality ignores
/// order, but re-serializing a decoded map emits its members sorted.
///
/// # Errors
///
/// Returns [`LlsdError::DepthExceeded`] for trees nested beyond the limit.
pub fn from_json(json: &serde_json::Value) -> Result<Value> {
    from_json_with(json, &CodecConfig::default())
}

/// Convert a JSON tree to a value under explicit limits.
///
/// # Errors
///
/// As for [`from_json`].
pub fn from_json_with(json: &serde_json::Value, config: &CodecConfig) -> Result<Value> {
    convert(json, 0, config.max_depth)
}

/// Parse JSON text into a value. Members come back sorted by key, as for
/// [`from_json`].
///
/// # Errors
///
/// Returns [`LlsdError::Json`] for malformed JSON, or as for [`from_json`].
pub fn from_json_str(text: &str) -> Result<Value> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    from_json(&json)
}

fn convert(json: &serde_json::Value, depth: usize, max_depth: usize) -> Result<Value> {
    let value = match json {
        serde_json::Value::Null => Value::Undefined,
        serde_json::Value::Bool(b) => Value::Boolean(*b),
        serde_json::Value::Number(n) => number(n),
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => {
            if depth >= max_depth {
                return Err(LlsdError::DepthExceeded(max_depth));
            }
            Value::Array(
                items
                    .iter()
                    .map(|item| convert(item, depth + 1, max_depth))
                    .collect::<Result<Vec<_>>>()?,
            )
        }
        serde_json::Value::Object(members) => {
            if depth >= max_depth {
                return Err(LlsdError::DepthExceeded(max_depth));
            }
            let mut map = Map::with_capacity(members.len());
            for (k, v) in members {
                map.insert(k.as_str(), convert(v, depth + 1, max_depth)?);
            }
            Value::Map(map)
        }
    };
    Ok(value)
}

fn number(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        if let Ok(i) = i32::try_from(i) {
            return Value::Integer(i);
        }
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && !is_negative_zero(f) && f.abs() <= f64::from(i32::MAX) => {
            Value::Integer(f as i32)
        }
        Some(f) => Value::Real(f),
        None => Value::Undefined,
    }
}
