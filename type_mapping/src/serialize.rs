//! Serialization utilities
//!
//! This module bridges composite property values (any serde type) to and
//! from the dynamic [`Value`] representation.

use crate::types::{Value, ValueError};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Convert a composite object into `Value::Json`
///
/// Objects serde cannot express as JSON (e.g. maps with non-string keys)
/// are rejected rather than stored as NULL.
pub fn to_object_value<T: Serialize>(data: &T) -> Result<Value, ValueError> {
    match serde_json::to_value(data) {
        Ok(serde_json::Value::Null) => Ok(Value::Null),
        Ok(json) => Ok(Value::Json(json)),
        Err(e) => Err(ValueError::Malformed {
            expected: "JSON object",
            reason: e.to_string(),
        }),
    }
}

/// Rebuild a composite object from `Value::Json` or JSON text
pub fn from_object_value<T: DeserializeOwned>(value: Value) -> Result<T, ValueError> {
    let json = match value {
        Value::Json(json) => json,
        Value::Text(text) => serde_json::from_str(&text).map_err(|e| ValueError::Malformed {
            expected: "JSON object",
            reason: e.to_string(),
        })?,
        Value::Null => serde_json::Value::Null,
        other => {
            return Err(ValueError::TypeMismatch {
                expected: "JSON object",
                found: other.kind(),
            })
        }
    };

    serde_json::from_value(json).map_err(|e| ValueError::Malformed {
        expected: "JSON object",
        reason: e.to_string(),
    })
}
