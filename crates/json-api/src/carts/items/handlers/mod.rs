//! Cart Item Handlers

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub(crate) mod clear;
pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod update;

/// Quantity as a number, accepting numeric strings. Anything else is `0`,
/// which adds nothing or removes the line.
fn lenient_quantity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let quantity = match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse().unwrap_or(0.0),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => 0.0,
    };

    Ok(quantity)
}
