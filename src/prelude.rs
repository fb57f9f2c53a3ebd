//! Convenience re-exports for common RowHaus usage
//!
//! This prelude module re-exports the most commonly used items from the RowHaus crates,
//! making it easier to import everything you need with a single use statement.
//!
//! # Example
//!
//! ```rust
//! use rowhaus::prelude::*;
//!
//! // Now you have access to all the common RowHaus types and traits
//! ```

// Core RowHaus components
pub use crate::core::RowHaus;
pub use crate::errors::RowHausError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, PlaceholderStyle, StatementConfig};

// Re-export commonly used row-adapter types for convenience
pub use row_adapter::prelude::*;

// Re-export row_adapter module for macro-generated code
pub use row_adapter;

// Derive macro for model schemas
pub use row_derive::RowModel;

// Common external dependencies
pub use async_trait;
pub use sqlx;
pub use tokio;

// Commonly used sqlx types
pub use sqlx::{Row, Sqlite, Transaction};
