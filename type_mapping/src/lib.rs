//! Unified value and type mapping between Rust model properties and SQLite
//! This crate provides the dynamic value model shared across the rowhaus ecosystem

pub mod serialize;
pub mod sql;
pub mod types;
pub mod validate;

pub use serialize::{from_object_value, to_object_value};
pub use sql::{is_optional_type, rust_type_to_repr, rust_type_to_sqlite_type};
pub use types::{timestamp_to_text, FromValue, PropertyRepr, ToValue, Value, ValueError, ValueKind};
pub use validate::{is_reserved_keyword, supports_direct_value_conversion, SQLITE_RESERVED_KEYWORDS};
