//! Validation utilities for type mapping
//!
//! This module provides validation functions
//! for type mapping operations.

/// Check if a Rust type converts to a [`Value`](crate::Value) through
/// `ToValue`/`FromValue` rather than the serde object bridge
pub fn supports_direct_value_conversion(rust_type: &str) -> bool {
    let normalized = rust_type.replace(' ', "");
    let inner = normalized
        .strip_prefix("Option<")
        .and_then(|inner| inner.strip_suffix('>'))
        .unwrap_or(&normalized);

    matches!(
        inner,
        "String"
            | "bool"
            | "i8"
            | "i16"
            | "i32"
            | "i64"
            | "u8"
            | "u16"
            | "u32"
            | "u64"
            | "isize"
            | "usize"
            | "f32"
            | "f64"
            | "Vec<u8>"
            | "Uuid"
            | "uuid::Uuid"
            | "DateTime<Utc>"
            | "chrono::DateTime<chrono::Utc>"
            | "chrono::DateTime<Utc>"
            | "serde_json::Value"
    )
}

/// Keywords SQLite refuses as bare identifiers
///
/// Shared by the derive's compile-time column checks and the statement
/// builder's runtime identifier validation.
pub const SQLITE_RESERVED_KEYWORDS: &[&str] = &[
    "ADD",
    "ALL",
    "ALTER",
    "AND",
    "AS",
    "AUTOINCREMENT",
    "BETWEEN",
    "CASE",
    "CHECK",
    "COLLATE",
    "COMMIT",
    "CONSTRAINT",
    "CREATE",
    "CROSS",
    "CURRENT_DATE",
    "CURRENT_TIME",
    "CURRENT_TIMESTAMP",
    "DEFAULT",
    "DEFERRABLE",
    "DELETE",
    "DISTINCT",
    "DROP",
    "ELSE",
    "ESCAPE",
    "EXCEPT",
    "EXISTS",
    "FOREIGN",
    "FROM",
    "FULL",
    "GROUP",
    "HAVING",
    "IN",
    "INDEX",
    "INNER",
    "INSERT",
    "INTERSECT",
    "INTO",
    "IS",
    "ISNULL",
    "JOIN",
    "LEFT",
    "LIMIT",
    "NATURAL",
    "NOT",
    "NOTNULL",
    "NULL",
    "ON",
    "OR",
    "ORDER",
    "OUTER",
    "PRIMARY",
    "REFERENCES",
    "RETURNING",
    "RIGHT",
    "ROLLBACK",
    "SELECT",
    "SET",
    "TABLE",
    "THEN",
    "TO",
    "TRANSACTION",
    "UNION",
    "UNIQUE",
    "UPDATE",
    "USING",
    "VALUES",
    "WHEN",
    "WHERE",
];

/// Check a name against [`SQLITE_RESERVED_KEYWORDS`], ignoring case
pub fn is_reserved_keyword(name: &str) -> bool {
    SQLITE_RESERVED_KEYWORDS.contains(&name.to_ascii_uppercase().as_str())
}
