//! Table-bound store
//!
//! [`RowStore`] pairs an [`Adapter`] with a [`StatementExecutor`] and a
//! table name, so models can be written and read back in one call.

use crate::adapter::Adapter;
use crate::encoder::EncodedModel;
use crate::errors::AdapterError;
use crate::executor::StatementExecutor;
use crate::model::Serializing;
use crate::statement::Intent;
use thiserror::Error;
use type_mapping::Value;

/// Failure of a store operation
#[derive(Error, Debug)]
pub enum StoreError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error("statement execution failed: {0}")]
    Execution(#[source] E),
}

impl<E: std::error::Error + 'static> StoreError<E> {
    pub fn adapter_error(&self) -> Option<&AdapterError> {
        match self {
            StoreError::Adapter(e) => Some(e),
            StoreError::Execution(_) => None,
        }
    }
}

/// Persists models of type `M` in one table through executor `E`
#[derive(Debug)]
pub struct RowStore<M, E> {
    adapter: Adapter<M>,
    executor: E,
    table: String,
}

impl<M: Serializing, E: StatementExecutor> RowStore<M, E> {
    pub fn new(adapter: Adapter<M>, executor: E, table: impl Into<String>) -> Self {
        Self {
            adapter,
            executor,
            table: table.into(),
        }
    }

    pub fn adapter(&self) -> &Adapter<M> {
        &self.adapter
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    async fn write(&self, model: &M, intent: Intent) -> Result<u64, StoreError<E::Error>> {
        let EncodedModel { statement, .. } = self.adapter.encode(model, intent, &self.table)?;
        let affected = self
            .executor
            .execute(&statement)
            .await
            .map_err(StoreError::Execution)?;

        debug_log!("{} on {} affected {} rows", intent, self.table, affected);
        Ok(affected)
    }

    pub async fn insert(&self, model: &M) -> Result<u64, StoreError<E::Error>> {
        self.write(model, Intent::Insert).await
    }

    pub async fn update(&self, model: &M) -> Result<u64, StoreError<E::Error>> {
        self.write(model, Intent::Update).await
    }

    pub async fn delete(&self, model: &M) -> Result<u64, StoreError<E::Error>> {
        self.write(model, Intent::Delete).await
    }

    /// Run `sql` and decode every returned row
    pub async fn fetch_all(&self, sql: &str, bindings: &[Value]) -> Result<Vec<M>, StoreError<E::Error>> {
        let rows = self
            .executor
            .fetch_rows(sql, bindings)
            .await
            .map_err(StoreError::Execution)?;
        Ok(self.adapter.decode_all(&rows)?)
    }

    /// Run `sql` and decode the first row, if any
    pub async fn fetch_optional(
        &self,
        sql: &str,
        bindings: &[Value],
    ) -> Result<Option<M>, StoreError<E::Error>> {
        let rows = self
            .executor
            .fetch_rows(sql, bindings)
            .await
            .map_err(StoreError::Execution)?;

        match rows.first() {
            Some(row) => Ok(Some(self.adapter.decode(row)?)),
            None => Ok(None),
        }
    }
}
