//! SQL type conversion utilities
//!
//! This module handles conversion between Rust types
//! and their SQLite equivalents.

fn normalize(rust_type: &str) -> String {
    // Normalize type string by removing all whitespace for consistent matching
    rust_type.replace(' ', "")
}

/// Strip a single `Option<...>` wrapper
fn unwrap_option(normalized: &str) -> &str {
    normalized
        .strip_prefix("Option<")
        .and_then(|inner| inner.strip_suffix('>'))
        .unwrap_or(normalized)
}

/// Map Rust type names to SQLite column types for column-definition generation
pub fn rust_type_to_sqlite_type(rust_type: &str) -> &'static str {
    let normalized = normalize(rust_type);
    match unwrap_option(&normalized) {
        "bool" => "INTEGER",
        "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "isize" => "INTEGER",
        // Values above i64::MAX are carried as decimal text; NUMERIC affinity
        // would coerce that text to REAL and lose precision
        "u64" | "usize" => "TEXT",
        "f32" | "f64" => "REAL",
        "String" | "&str" | "&'staticstr" => "TEXT",
        "Vec<u8>" => "BLOB",
        "Uuid" | "uuid::Uuid" => "TEXT",
        "DateTime<Utc>" | "chrono::DateTime<chrono::Utc>" | "chrono::DateTime<Utc>" => "TEXT",
        "serde_json::Value" | "Value" => "TEXT",
        _ => "TEXT", // default fallback: composite values are stored as JSON text
    }
}

/// Get the PropertyRepr variant name for a Rust type
/// This is used by the derive macro to tag each generated property
pub fn rust_type_to_repr(rust_type: &str) -> &'static str {
    let normalized = normalize(rust_type);
    match unwrap_option(&normalized) {
        "bool" => "Bool",
        "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "u64" | "isize" | "usize" => {
            "Integer"
        }
        "f32" | "f64" => "Real",
        "String" | "&str" | "&'staticstr" => "Text",
        "Vec<u8>" => "Blob",
        "Uuid" | "uuid::Uuid" => "Uuid",
        "DateTime<Utc>" | "chrono::DateTime<chrono::Utc>" | "chrono::DateTime<Utc>" => {
            "Timestamp"
        }
        "serde_json::Value" => "Json",
        _ => "Object",
    }
}

/// Check if a Rust type is Optional (nullable in SQL)
pub fn is_optional_type(rust_type: &str) -> bool {
    let normalized = normalize(rust_type);
    normalized.starts_with("Option<") || normalized.starts_with("std::option::Option<")
}
