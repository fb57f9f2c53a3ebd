//! Core RowHaus functionality
//!
//! This module contains the main RowHaus struct, which owns the SQLite
//! connection pool and hands out adapters and table-bound stores configured
//! from one [`AppConfig`].

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

use crate::errors::RowHausError;
use config::AppConfig;
use row_adapter::{Adapter, RowStore, Serializing, SqliteExecutor};

/// Main RowHaus coordinator that manages the database connection
pub struct RowHaus {
    pool: SqlitePool,
    config: AppConfig,
}

impl RowHaus {
    /// Create new RowHaus with database connection
    pub async fn new(config: &AppConfig) -> Result<Self, RowHausError> {
        config.validate()?;
        let database = &config.database;

        let connect_options = SqliteConnectOptions::from_str(&database.url)?
            .create_if_missing(database.create_if_missing);

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(database.max_connections)
            .min_connections(database.min_connections)
            .acquire_timeout(Duration::from_secs(database.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(database.idle_timeout_seconds));

        // Set max lifetime if specified
        if database.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(database.max_lifetime_seconds));
        } else if database.is_in_memory() {
            // Recycling the connection would drop the in-memory database
            pool_options = pool_options.max_lifetime(None).idle_timeout(None);
        }

        let pool = pool_options.connect_with(connect_options).await?;
        debug_log!("Connected to {}", database.url);

        Ok(Self {
            pool,
            config: config.clone(),
        })
    }

    /// Get database pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Executor running statements on this instance's pool
    pub fn executor(&self) -> SqliteExecutor {
        SqliteExecutor::new(self.pool.clone())
    }

    /// Adapter for `M` using the configured statement options
    pub fn adapter<M: Serializing>(&self) -> Adapter<M> {
        Adapter::from_config(&self.config.statement)
    }

    /// Store persisting `M` in `table`
    pub fn store<M: Serializing>(&self, table: impl Into<String>) -> RowStore<M, SqliteExecutor> {
        RowStore::new(self.adapter::<M>(), self.executor(), table)
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), RowHausError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
