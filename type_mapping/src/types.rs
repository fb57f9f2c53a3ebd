//! Value model definitions
//!
//! This module provides the dynamic value shared by in-memory model
//! properties and SQLite storage, plus the conversion traits used by
//! property getters and setters.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Canonical text form of a timestamp: RFC 3339 in UTC with a `Z` suffix
pub fn timestamp_to_text(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Dynamic value flowing between model properties and SQLite columns.
///
/// Only `Null`, `Integer`, `Real`, `Text` and `Blob` are SQLite storage
/// classes. The remaining variants are in-memory representations that a
/// transformer is expected to map onto a storage class before binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Json(serde_json::Value),
}

/// Discriminant of a [`Value`], used in error messages and dispatch tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Integer,
    Real,
    Text,
    Blob,
    Uuid,
    Timestamp,
    Json,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Integer => "integer",
            ValueKind::Real => "real",
            ValueKind::Text => "text",
            ValueKind::Blob => "blob",
            ValueKind::Uuid => "uuid",
            ValueKind::Timestamp => "timestamp",
            ValueKind::Json => "json",
        };
        f.write_str(name)
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Integer(_) => ValueKind::Integer,
            Value::Real(_) => ValueKind::Real,
            Value::Text(_) => ValueKind::Text,
            Value::Blob(_) => ValueKind::Blob,
            Value::Uuid(_) => ValueKind::Uuid,
            Value::Timestamp(_) => ValueKind::Timestamp,
            Value::Json(_) => ValueKind::Json,
        }
    }

    /// Whether the value is one of the five SQLite storage classes
    pub fn is_storable(&self) -> bool {
        matches!(
            self,
            Value::Null | Value::Integer(_) | Value::Real(_) | Value::Text(_) | Value::Blob(_)
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(s) => write!(f, "'{}'", s),
            Value::Blob(b) => write!(f, "<{} bytes>", b.len()),
            Value::Uuid(u) => write!(f, "{}", u),
            Value::Timestamp(t) => f.write_str(&timestamp_to_text(t)),
            Value::Json(j) => write!(f, "{}", j),
        }
    }
}

/// Declared primitive representation of a model property.
///
/// `Object` is the generic object representation: the property holds a
/// composite value of the named class rather than a primitive encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyRepr {
    Bool,
    Integer,
    Real,
    Text,
    Blob,
    Uuid,
    Timestamp,
    Json,
    Object(&'static str),
}

impl PropertyRepr {
    pub fn is_object(&self) -> bool {
        matches!(self, PropertyRepr::Object(_))
    }

    /// Class name for object representations
    pub fn class_name(&self) -> Option<&'static str> {
        match self {
            PropertyRepr::Object(class) => Some(class),
            _ => None,
        }
    }
}

/// Failures converting a [`Value`] into a concrete Rust type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: ValueKind,
    },

    #[error("unexpected NULL for non-optional {expected}")]
    UnexpectedNull { expected: &'static str },

    #[error("value {value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },

    #[error("malformed {expected}: {reason}")]
    Malformed {
        expected: &'static str,
        reason: String,
    },
}

impl ValueError {
    fn mismatch(expected: &'static str, found: &Value) -> Self {
        match found {
            Value::Null => ValueError::UnexpectedNull { expected },
            other => ValueError::TypeMismatch {
                expected,
                found: other.kind(),
            },
        }
    }
}

/// Trait for reading a model property into a [`Value`]
pub trait ToValue {
    fn to_value(&self) -> Value;
}

/// Trait for writing a [`Value`] back into a model property
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(value)
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(b) => Ok(b),
            Value::Integer(0) => Ok(false),
            Value::Integer(1) => Ok(true),
            other => Err(ValueError::mismatch("bool", &other)),
        }
    }
}

macro_rules! impl_integer {
    ($($ty:ty),*) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value {
                    Value::Integer(i64::from(*self))
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ValueError> {
                    match value {
                        Value::Integer(i) => <$ty>::try_from(i).map_err(|_| ValueError::OutOfRange {
                            value: i.to_string(),
                            target: stringify!($ty),
                        }),
                        other => Err(ValueError::mismatch(stringify!($ty), &other)),
                    }
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, u8, u16, u32);

impl ToValue for u64 {
    fn to_value(&self) -> Value {
        // SQLite integers are signed 64-bit; larger values are carried as
        // decimal text, which is why u64 columns get TEXT affinity
        match i64::try_from(*self) {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::Text(self.to_string()),
        }
    }
}

impl FromValue for u64 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Integer(i) => u64::try_from(i).map_err(|_| ValueError::OutOfRange {
                value: i.to_string(),
                target: "u64",
            }),
            Value::Text(s) => s.trim().parse::<u64>().map_err(|e| ValueError::Malformed {
                expected: "u64",
                reason: e.to_string(),
            }),
            other => Err(ValueError::mismatch("u64", &other)),
        }
    }
}

impl ToValue for usize {
    fn to_value(&self) -> Value {
        match u64::try_from(*self) {
            Ok(v) => v.to_value(),
            Err(_) => Value::Text(self.to_string()),
        }
    }
}

impl FromValue for usize {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        let wide = u64::from_value(value).map_err(|e| match e {
            ValueError::OutOfRange { value, .. } => ValueError::OutOfRange {
                value,
                target: "usize",
            },
            other => other,
        })?;
        usize::try_from(wide).map_err(|_| ValueError::OutOfRange {
            value: wide.to_string(),
            target: "usize",
        })
    }
}

impl ToValue for isize {
    fn to_value(&self) -> Value {
        match i64::try_from(*self) {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::Text(self.to_string()),
        }
    }
}

impl FromValue for isize {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Integer(i) => isize::try_from(i).map_err(|_| ValueError::OutOfRange {
                value: i.to_string(),
                target: "isize",
            }),
            other => Err(ValueError::mismatch("isize", &other)),
        }
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Real(*self)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Real(r) => Ok(r),
            Value::Integer(i) => Ok(i as f64),
            other => Err(ValueError::mismatch("f64", &other)),
        }
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Real(f64::from(*self))
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        f64::from_value(value).map(|r| r as f32)
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl ToValue for &str {
    fn to_value(&self) -> Value {
        Value::Text((*self).to_string())
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(ValueError::mismatch("String", &other)),
        }
    }
}

impl ToValue for Vec<u8> {
    fn to_value(&self) -> Value {
        Value::Blob(self.clone())
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Blob(b) => Ok(b),
            Value::Text(s) => Ok(s.into_bytes()),
            other => Err(ValueError::mismatch("Vec<u8>", &other)),
        }
    }
}

impl ToValue for Uuid {
    fn to_value(&self) -> Value {
        Value::Uuid(*self)
    }
}

impl FromValue for Uuid {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Uuid(u) => Ok(u),
            other => Err(ValueError::mismatch("Uuid", &other)),
        }
    }
}

impl ToValue for DateTime<Utc> {
    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Timestamp(t) => Ok(t),
            other => Err(ValueError::mismatch("DateTime<Utc>", &other)),
        }
    }
}

impl ToValue for serde_json::Value {
    fn to_value(&self) -> Value {
        Value::Json(self.clone())
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Json(j) => Ok(j),
            other => Err(ValueError::mismatch("serde_json::Value", &other)),
        }
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Convert basic Rust types to Value
impl From<String> for Value {
    fn from(val: String) -> Self {
        Value::Text(val)
    }
}

impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::Text(val.to_string())
    }
}

impl From<i64> for Value {
    fn from(val: i64) -> Self {
        Value::Integer(val)
    }
}

impl From<i32> for Value {
    fn from(val: i32) -> Self {
        Value::Integer(i64::from(val))
    }
}

impl From<f64> for Value {
    fn from(val: f64) -> Self {
        Value::Real(val)
    }
}

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Value::Bool(val)
    }
}

impl From<Vec<u8>> for Value {
    fn from(val: Vec<u8>) -> Self {
        Value::Blob(val)
    }
}

impl From<Uuid> for Value {
    fn from(val: Uuid) -> Self {
        Value::Uuid(val)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(val: DateTime<Utc>) -> Self {
        Value::Timestamp(val)
    }
}

impl From<serde_json::Value> for Value {
    fn from(val: serde_json::Value) -> Self {
        Value::Json(val)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(val: Option<T>) -> Self {
        match val {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storable_kinds() {
        assert!(Value::Null.is_storable());
        assert!(Value::Integer(1).is_storable());
        assert!(Value::Blob(vec![1]).is_storable());
        assert!(!Value::Bool(true).is_storable());
        assert!(!Value::Uuid(Uuid::nil()).is_storable());
    }

    #[test]
    fn test_option_maps_null() {
        assert_eq!(Option::<i64>::from_value(Value::Null), Ok(None));
        assert_eq!(Option::<i64>::from_value(Value::Integer(3)), Ok(Some(3)));
        assert_eq!(None::<String>.to_value(), Value::Null);
    }

    #[test]
    fn test_null_rejected_for_required() {
        let err = i64::from_value(Value::Null).unwrap_err();
        assert_eq!(err, ValueError::UnexpectedNull { expected: "i64" });
    }

    #[test]
    fn test_narrow_integer_range() {
        assert_eq!(i8::from_value(Value::Integer(12)), Ok(12));
        assert!(matches!(
            i8::from_value(Value::Integer(300)),
            Err(ValueError::OutOfRange { target: "i8", .. })
        ));
    }

    #[test]
    fn test_large_u64_degrades_to_text() {
        assert_eq!(u64::MAX.to_value(), Value::Text(u64::MAX.to_string()));
        assert_eq!(u64::from_value(Value::Text(u64::MAX.to_string())), Ok(u64::MAX));
        assert_eq!(u64::from_value(Value::Text("42".to_string())), Ok(42));
    }

    #[test]
    fn test_pointer_sized_integers() {
        assert_eq!(5usize.to_value(), Value::Integer(5));
        assert_eq!(usize::from_value(Value::Integer(5)), Ok(5));
        assert_eq!(usize::from_value(Value::Text("5".to_string())), Ok(5));
        assert!(matches!(
            usize::from_value(Value::Integer(-1)),
            Err(ValueError::OutOfRange { target: "usize", .. })
        ));

        assert_eq!((-9isize).to_value(), Value::Integer(-9));
        assert_eq!(isize::from_value(Value::Integer(-9)), Ok(-9));
        assert!(isize::from_value(Value::Real(1.5)).is_err());
    }

    #[test]
    fn test_timestamp_text_uses_zulu_suffix() {
        use chrono::TimeZone;

        let stamp = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(timestamp_to_text(&stamp), "2024-03-01T12:00:00Z");
        assert_eq!(Value::Timestamp(stamp).to_string(), timestamp_to_text(&stamp));
    }

    #[test]
    fn test_type_mismatch_reports_kind() {
        let err = String::from_value(Value::Integer(7)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected String, found integer"
        );
    }

    #[test]
    fn test_object_repr_class_name() {
        assert_eq!(PropertyRepr::Object("Address").class_name(), Some("Address"));
        assert_eq!(PropertyRepr::Text.class_name(), None);
        assert!(PropertyRepr::Object("Address").is_object());
    }
}
