//! # Configuration Management for RowHaus
//!
//! This crate provides centralized configuration structures for all RowHaus components:
//! the SQLite connection pool and statement generation settings.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::{DatabaseConfig, PlaceholderStyle, StatementConfig};
//!
//! let db_config = DatabaseConfig::new(
//!     "sqlite::memory:".to_string(),
//!     1, 5, 30, 600, 3600, true,
//! );
//!
//! let statement_config = StatementConfig::new(PlaceholderStyle::Positional, false);
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [database]
//! url = "sqlite://data/app.db"
//! min_connections = 1
//! max_connections = 5
//! connection_timeout_seconds = 30
//! idle_timeout_seconds = 600
//! max_lifetime_seconds = 3600
//! create_if_missing = true
//!
//! [statement]
//! placeholder_style = "positional"
//! validate_identifiers = false
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from rowhaus.toml (or the path in ROWHAUS_CONFIG)
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./rowhaus.toml";
const CONFIG_PATH_VAR: &str = "ROWHAUS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub statement: StatementConfig,
}

/// SQLite connection pool configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub connection_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
    pub max_lifetime_seconds: u64,
    pub create_if_missing: bool,
}

/// How value placeholders are rendered in generated statements
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStyle {
    /// `?` placeholders bound in order
    #[default]
    Positional,
    /// `:column` placeholders bound by name
    Named,
}

/// Statement generation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StatementConfig {
    pub placeholder_style: PlaceholderStyle,
    /// Reject table and column names that are not plain SQL identifiers
    pub validate_identifiers: bool,
}

impl AppConfig {
    /// Load configuration from TOML file specified in .env or defaults
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is fine; the variable may come from the environment
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            Self::from_file(&config_path)
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)
        } else {
            Err(ConfigError::Invalid(format!(
                "Config path must be specified in .env file as {} or in {} file",
                CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH
            )))
        }
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.is_empty() {
            return Err(ConfigError::Invalid(
                "Database url cannot be empty".to_string(),
            ));
        }
        if !self.database.url.starts_with("sqlite:") {
            return Err(ConfigError::Invalid(format!(
                "Database url must use the sqlite: scheme, got '{}'",
                self.database.url
            )));
        }
        if self.database.min_connections == 0 {
            return Err(ConfigError::Invalid(
                "Database min_connections must be greater than 0".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "Database max_connections must be greater than 0".to_string(),
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Invalid(
                "Database min_connections cannot be greater than max_connections".to_string(),
            ));
        }
        if self.database.connection_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "Database connection_timeout_seconds must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        // A single connection keeps every query on the same in-memory database
        Self::new("sqlite::memory:".to_string(), 1, 1, 30, 600, 0, true)
    }
}

impl DatabaseConfig {
    /// Create a new database configuration
    pub fn new(
        url: String,
        min_connections: u32,
        max_connections: u32,
        connection_timeout_seconds: u64,
        idle_timeout_seconds: u64,
        max_lifetime_seconds: u64,
        create_if_missing: bool,
    ) -> Self {
        Self {
            url,
            min_connections,
            max_connections,
            connection_timeout_seconds,
            idle_timeout_seconds,
            max_lifetime_seconds,
            create_if_missing,
        }
    }

    /// Whether the url points at a private in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

impl StatementConfig {
    /// Create a new statement configuration
    pub fn new(placeholder_style: PlaceholderStyle, validate_identifiers: bool) -> Self {
        Self {
            placeholder_style,
            validate_identifiers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.database.is_in_memory());
        assert_eq!(config.statement.placeholder_style, PlaceholderStyle::Positional);
    }

    #[test]
    fn test_parse_full_document() {
        let config = AppConfig::from_toml_str(
            r#"
            [database]
            url = "sqlite://data/app.db"
            min_connections = 2
            max_connections = 8
            connection_timeout_seconds = 10
            idle_timeout_seconds = 60
            max_lifetime_seconds = 0
            create_if_missing = false

            [statement]
            placeholder_style = "named"
            validate_identifiers = true
            "#,
        )
        .unwrap();

        assert_eq!(config.database.url, "sqlite://data/app.db");
        assert_eq!(config.database.max_connections, 8);
        assert!(!config.database.create_if_missing);
        assert!(!config.database.is_in_memory());
        assert_eq!(config.statement.placeholder_style, PlaceholderStyle::Named);
        assert!(config.statement.validate_identifiers);
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let config = AppConfig::from_toml_str("[statement]\nvalidate_identifiers = true\n").unwrap();
        assert_eq!(config.database, DatabaseConfig::default());
        assert!(config.statement.validate_identifiers);
    }

    #[test]
    fn test_rejects_non_sqlite_url() {
        let err = AppConfig::from_toml_str("[database]\nurl = \"postgres://localhost/db\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_inverted_pool_bounds() {
        let err = AppConfig::from_toml_str(
            "[database]\nmin_connections = 4\nmax_connections = 2\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("min_connections"));
    }

    #[test]
    fn test_rejects_unknown_placeholder_style() {
        let err = AppConfig::from_toml_str("[statement]\nplaceholder_style = \"dollar\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[database]\nurl = \"sqlite::memory:\"\nmax_connections = 3").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.database.max_connections, 3);
    }
}
