//! Lenient serde helpers for request bodies
//!
//! Request payloads come from forms that may send numbers as strings, empty
//! strings or garbage. These helpers never fail: anything that is not a finite
//! number deserializes to `None`, and the service layer applies its fallback.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Interpret a JSON value as a finite f64
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Interpret a JSON value as an integer (fractions truncated toward zero)
pub fn coerce_i64(value: &Value) -> Option<i64> {
    if let Value::Number(n) = value
        && let Some(i) = n.as_i64()
    {
        return Some(i);
    }
    let f = coerce_f64(value)?.trunc();
    (f >= i64::MIN as f64 && f <= i64::MAX as f64).then_some(f as i64)
}

/// `Option<f64>` that swallows invalid input
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_f64))
}

/// `Option<i64>` that swallows invalid input
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_i64))
}

/// PATCH numbers: absent or null stays `None`, present but invalid becomes 0
pub fn patch_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(|v| coerce_f64(&v).unwrap_or(0.0)))
}

/// Integer counterpart of [`patch_f64`]
pub fn patch_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(|v| coerce_i64(&v).unwrap_or(0)))
}

/// `Option<String>` that accepts numbers too and treats blank as absent
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
