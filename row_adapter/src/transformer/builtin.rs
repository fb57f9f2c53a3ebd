//! Built-in transformers
//!
//! Every built-in passes `Value::Null` through unchanged in both directions
//! and accepts values that are already in their target form.

use super::{TransformError, Transformer};
use chrono::{DateTime, Utc};
use type_mapping::{timestamp_to_text, Value};
use uuid::Uuid;

fn unexpected(transformer: &str, value: &Value) -> TransformError {
    TransformError::new(format!(
        "{} transformer cannot convert {} value {}",
        transformer,
        value.kind(),
        value
    ))
}

/// Booleans stored as integer 0/1
pub fn boolean() -> Transformer {
    Transformer::new(
        "boolean",
        |value| match value {
            Value::Bool(b) => Ok(Value::Integer(i64::from(b))),
            Value::Null | Value::Integer(_) => Ok(value),
            other => Err(unexpected("boolean", &other)),
        },
        |value| match value {
            Value::Integer(i) => Ok(Value::Bool(i != 0)),
            Value::Text(ref s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => Ok(Value::Bool(true)),
                "0" | "false" | "no" => Ok(Value::Bool(false)),
                _ => Err(unexpected("boolean", &value)),
            },
            Value::Null | Value::Bool(_) => Ok(value),
            other => Err(unexpected("boolean", &other)),
        },
    )
}

/// UUIDs stored as hyphenated text
pub fn uuid_text() -> Transformer {
    Transformer::new(
        "uuid_text",
        |value| match value {
            Value::Uuid(u) => Ok(Value::Text(u.hyphenated().to_string())),
            Value::Null | Value::Text(_) => Ok(value),
            other => Err(unexpected("uuid_text", &other)),
        },
        |value| match value {
            Value::Text(s) => Uuid::parse_str(&s)
                .map(Value::Uuid)
                .map_err(|e| TransformError::new(format!("invalid uuid '{}': {}", s, e))),
            Value::Blob(bytes) => Uuid::from_slice(&bytes)
                .map(Value::Uuid)
                .map_err(|e| TransformError::new(format!("invalid uuid bytes: {}", e))),
            Value::Null | Value::Uuid(_) => Ok(value),
            other => Err(unexpected("uuid_text", &other)),
        },
    )
}

/// Timestamps stored as RFC 3339 text in UTC
pub fn timestamp_rfc3339() -> Transformer {
    Transformer::new(
        "timestamp_rfc3339",
        |value| match value {
            Value::Timestamp(t) => Ok(Value::Text(timestamp_to_text(&t))),
            Value::Null | Value::Text(_) => Ok(value),
            other => Err(unexpected("timestamp_rfc3339", &other)),
        },
        |value| match value {
            Value::Text(s) => DateTime::parse_from_rfc3339(&s)
                .map(|t| Value::Timestamp(t.with_timezone(&Utc)))
                .map_err(|e| TransformError::new(format!("invalid timestamp '{}': {}", s, e))),
            Value::Null | Value::Timestamp(_) => Ok(value),
            other => Err(unexpected("timestamp_rfc3339", &other)),
        },
    )
}

/// Timestamps stored as integer seconds since the Unix epoch
pub fn timestamp_unix() -> Transformer {
    Transformer::new(
        "timestamp_unix",
        |value| match value {
            Value::Timestamp(t) => Ok(Value::Integer(t.timestamp())),
            Value::Null | Value::Integer(_) => Ok(value),
            other => Err(unexpected("timestamp_unix", &other)),
        },
        |value| match value {
            Value::Integer(secs) => DateTime::from_timestamp(secs, 0)
                .map(Value::Timestamp)
                .ok_or_else(|| TransformError::new(format!("timestamp {} out of range", secs))),
            Value::Null | Value::Timestamp(_) => Ok(value),
            other => Err(unexpected("timestamp_unix", &other)),
        },
    )
}

/// JSON documents stored as text
pub fn json_text() -> Transformer {
    Transformer::new(
        "json_text",
        |value| match value {
            Value::Json(json) => Ok(Value::Text(json.to_string())),
            Value::Null | Value::Text(_) => Ok(value),
            other => Err(unexpected("json_text", &other)),
        },
        |value| match value {
            Value::Text(s) => serde_json::from_str(&s)
                .map(Value::Json)
                .map_err(|e| TransformError::new(format!("invalid JSON: {}", e))),
            Value::Null | Value::Json(_) => Ok(value),
            other => Err(unexpected("json_text", &other)),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_boolean_round_trip() {
        let t = boolean();
        assert_eq!(t.to_storage(Value::Bool(true)), Ok(Value::Integer(1)));
        assert_eq!(t.to_storage(Value::Bool(false)), Ok(Value::Integer(0)));
        assert_eq!(t.from_storage(Value::Integer(1)), Ok(Value::Bool(true)));
        assert_eq!(t.from_storage(Value::Integer(0)), Ok(Value::Bool(false)));
        assert_eq!(
            t.from_storage(Value::Text("TRUE".to_string())),
            Ok(Value::Bool(true))
        );
        assert_eq!(t.from_storage(Value::Null), Ok(Value::Null));
    }

    #[test]
    fn test_boolean_rejects_garbage() {
        let err = boolean()
            .from_storage(Value::Text("maybe".to_string()))
            .unwrap_err();
        assert!(err.reason().contains("boolean"));
        assert!(boolean().to_storage(Value::Real(0.5)).is_err());
    }

    #[test]
    fn test_uuid_text() {
        let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let t = uuid_text();
        let stored = t.to_storage(Value::Uuid(id)).unwrap();
        assert_eq!(
            stored,
            Value::Text("67e55044-10b1-426f-9247-bb680e5fe0c8".to_string())
        );
        assert_eq!(t.from_storage(stored), Ok(Value::Uuid(id)));
        assert_eq!(
            t.from_storage(Value::Blob(id.as_bytes().to_vec())),
            Ok(Value::Uuid(id))
        );
        assert!(t.from_storage(Value::Text("nope".to_string())).is_err());
    }

    #[test]
    fn test_timestamp_rfc3339() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let t = timestamp_rfc3339();
        let stored = t.to_storage(Value::Timestamp(at)).unwrap();
        assert_eq!(stored, Value::Text("2024-05-01T12:30:00Z".to_string()));
        assert_eq!(t.from_storage(stored), Ok(Value::Timestamp(at)));
        assert_eq!(
            t.from_storage(Value::Text("2024-05-01T14:30:00+02:00".to_string())),
            Ok(Value::Timestamp(at))
        );
    }

    #[test]
    fn test_timestamp_unix() {
        let at = Utc.with_ymd_and_hms(2001, 9, 9, 1, 46, 40).unwrap();
        let t = timestamp_unix();
        assert_eq!(
            t.to_storage(Value::Timestamp(at)),
            Ok(Value::Integer(1_000_000_000))
        );
        assert_eq!(
            t.from_storage(Value::Integer(1_000_000_000)),
            Ok(Value::Timestamp(at))
        );
        assert!(t.from_storage(Value::Integer(i64::MAX)).is_err());
    }

    #[test]
    fn test_json_text() {
        let t = json_text();
        let stored = t.to_storage(Value::Json(json!({"a": [1, 2]}))).unwrap();
        assert_eq!(stored, Value::Text(r#"{"a":[1,2]}"#.to_string()));
        assert_eq!(t.from_storage(stored), Ok(Value::Json(json!({"a": [1, 2]}))));
        assert!(t.from_storage(Value::Text("{".to_string())).is_err());
    }
}
