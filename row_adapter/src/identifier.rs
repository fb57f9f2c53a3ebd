//! Identifier validation
//!
//! Table and column names are spliced into statement text verbatim. When
//! identifier validation is enabled the statement builder checks each one
//! with [`ValidatedIdentifier`] first.

use std::fmt;

/// Validation errors for SQL identifiers
#[derive(Debug, Clone, PartialEq)]
pub enum IdentifierError {
    /// Name is empty
    Empty,
    /// Name must start with a letter or underscore
    InvalidStartCharacter(String),
    /// Only alphanumeric characters and underscores are allowed
    InvalidCharacters(String),
    /// Name is a reserved SQLite keyword
    ReservedKeyword(String),
}

impl fmt::Display for IdentifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierError::Empty => write!(f, "Name cannot be empty"),
            IdentifierError::InvalidStartCharacter(name) => {
                write!(f, "Name '{}' must start with a letter or underscore", name)
            }
            IdentifierError::InvalidCharacters(name) => {
                write!(f, "Invalid characters in name '{}': only alphanumeric characters and underscores are allowed", name)
            }
            IdentifierError::ReservedKeyword(name) => {
                write!(f, "Name '{}' is a reserved SQLite keyword", name)
            }
        }
    }
}

impl std::error::Error for IdentifierError {}

/// A table or column name that is safe to splice into statement text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedIdentifier(String);

impl ValidatedIdentifier {
    pub fn new(name: &str) -> Result<Self, IdentifierError> {
        Self::validate(name)?;
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Check a name without keeping it
    pub fn is_valid(name: &str) -> bool {
        Self::validate(name).is_ok()
    }

    fn validate(name: &str) -> Result<(), IdentifierError> {
        let first_char = name.chars().next().ok_or(IdentifierError::Empty)?;
        if !first_char.is_ascii_alphabetic() && first_char != '_' {
            return Err(IdentifierError::InvalidStartCharacter(name.to_string()));
        }

        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(IdentifierError::InvalidCharacters(name.to_string()));
        }

        if type_mapping::is_reserved_keyword(name) {
            return Err(IdentifierError::ReservedKeyword(name.to_string()));
        }

        Ok(())
    }
}

impl fmt::Display for ValidatedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        let long_name = "a".repeat(200);
        let valid_names = [
            "users",
            "user_profiles",
            "UserProfiles",
            "_private_table",
            "table123",
            "full_name",
            long_name.as_str(),
        ];

        for name in valid_names {
            assert!(
                ValidatedIdentifier::new(name).is_ok(),
                "Should accept valid name: {}",
                name
            );
        }
    }

    #[test]
    fn test_invalid_identifiers() {
        let test_cases = [
            ("", IdentifierError::Empty),
            (
                "123table",
                IdentifierError::InvalidStartCharacter("123table".to_string()),
            ),
            (
                "user-name",
                IdentifierError::InvalidCharacters("user-name".to_string()),
            ),
            (
                "t; DROP TABLE t",
                IdentifierError::InvalidCharacters("t; DROP TABLE t".to_string()),
            ),
            (
                "values",
                IdentifierError::ReservedKeyword("values".to_string()),
            ),
            (
                "Select",
                IdentifierError::ReservedKeyword("Select".to_string()),
            ),
        ];

        for (name, expected_error) in test_cases {
            let result = ValidatedIdentifier::new(name);
            assert_eq!(result.unwrap_err(), expected_error, "name: {}", name);
        }
    }

    #[test]
    fn test_display_and_accessors() {
        let identifier = ValidatedIdentifier::new("accounts").unwrap();
        assert_eq!(identifier.to_string(), "accounts");
        assert_eq!(identifier.as_str(), "accounts");
        assert_eq!(identifier.into_string(), "accounts".to_string());
        assert!(ValidatedIdentifier::is_valid("id"));
        assert!(!ValidatedIdentifier::is_valid("where"));
    }
}
