//! Error types for the RowHaus crate
//!
//! This module contains the errors returned while setting up a RowHaus
//! instance. Mapping and statement errors live in `row_adapter::errors`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RowHausError {
    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
