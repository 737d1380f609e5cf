//! Deserialization helpers for loosely typed backend payloads.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

use crate::errors::MappingError;

/// Parses a decimal from a JSON number or numeric string without a detour
/// through `f64`, so the amount is carried exactly as the backend sent it.
pub fn decimal_from_value(value: &Value) -> Result<Decimal, MappingError> {
    let raw = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_string(),
        other => return Err(MappingError::InvalidAmount(other.to_string())),
    };

    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| MappingError::InvalidAmount(raw))
}

/// `deserialize_with` adapter for optional identifiers that may be numeric.
pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) => Ok(Some(id)),
        Some(Value::Number(id)) => Ok(Some(id.to_string())),
        Some(other) => Err(de::Error::custom(format!("unsupported id value {}", other))),
    }
}
