//! # RowHaus
//!
//! A SQLite model/row adapter: derive a schema for a plain struct, then
//! encode instances into parameterized INSERT/UPDATE/DELETE statements and
//! decode fetched rows back into instances.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rowhaus::prelude::*;
//!
//! #[derive(Debug, Clone, Default, PartialEq, RowModel)]
//! #[row(serializing)]
//! pub struct User {
//!     #[primary_key]
//!     pub id: i64,
//!
//!     #[column(name = "full_name")]
//!     pub name: String,
//!
//!     pub email: Option<String>,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let rowhaus = RowHaus::new(&AppConfig::default()).await?;
//!
//!     let adapter = rowhaus.adapter::<User>();
//!     sqlx::query(&format!("CREATE TABLE users ({})", adapter.column_definitions()?))
//!         .execute(rowhaus.pool())
//!         .await?;
//!
//!     let users = rowhaus.store::<User>("users");
//!     users
//!         .insert(&User {
//!             id: 1,
//!             name: "John Doe".to_string(),
//!             email: None,
//!         })
//!         .await?;
//!
//!     let found = users.fetch_optional("SELECT * FROM users WHERE id = ?", &[Value::Integer(1)]).await?;
//!     println!("Found user: {:?}", found);
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use core::RowHaus;
pub use errors::RowHausError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, PlaceholderStyle, StatementConfig};

// Re-export internal crates used by macros and public API
// These MUST be public for the generated macro code to work correctly
pub use row_adapter;
pub use row_derive::RowModel;
pub use type_mapping;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
