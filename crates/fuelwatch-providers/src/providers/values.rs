//! Lenient readers for loosely typed JSON fields (numbers that sometimes
//! arrive as strings, prices that arrive as `false`).

use fuelwatch_core::Price;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub(super) fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}

/// Strings verbatim, numbers in their JSON form, anything else empty.
pub(super) fn lenient_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

pub(super) fn unknown_price() -> Price {
    Price::Unknown
}

/// `deserialize_with` helper: positive numbers become `Known`, everything else
/// (`false`, `null`, `0`, strings) becomes `Unknown`.
pub(super) fn deserialize_price<'de, D>(deserializer: D) -> Result<Price, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().map_or(Price::Unknown, Price::from_raw),
        _ => Price::Unknown,
    })
}
