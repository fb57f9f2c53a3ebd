//! Statement execution seam
//!
//! The adapter only produces statement text and bindings. A
//! [`StatementExecutor`] runs them and hands rows back as [`RowMapping`]s;
//! [`SqliteExecutor`] is the sqlx-backed implementation.

use crate::statement::Statement;
use crate::RowMapping;
use async_trait::async_trait;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqlitePool, SqliteRow};
use sqlx::{Column, Row, Sqlite, TypeInfo, ValueRef};
use type_mapping::{timestamp_to_text, Value};

/// Runs generated statements against a store
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Execute a write statement, returning the number of affected rows
    async fn execute(&self, statement: &Statement) -> Result<u64, Self::Error>;

    /// Run a query and return every row as a column/value mapping
    async fn fetch_rows(&self, sql: &str, bindings: &[Value]) -> Result<Vec<RowMapping>, Self::Error>;
}

/// [`StatementExecutor`] over a sqlx SQLite pool
#[derive(Debug, Clone)]
pub struct SqliteExecutor {
    pool: SqlitePool,
}

impl SqliteExecutor {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Bind one value positionally. Kinds without a SQLite storage class are
/// bound in their canonical text form.
fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &Value,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        Value::Null => query.bind(Option::<i64>::None),
        Value::Bool(b) => query.bind(*b),
        Value::Integer(i) => query.bind(*i),
        Value::Real(f) => query.bind(*f),
        Value::Text(s) => query.bind(s.clone()),
        Value::Blob(bytes) => query.bind(bytes.clone()),
        Value::Uuid(u) => query.bind(u.hyphenated().to_string()),
        Value::Timestamp(t) => query.bind(timestamp_to_text(t)),
        Value::Json(json) => query.bind(json.to_string()),
    }
}

fn build_query<'q>(sql: &'q str, bindings: &[Value]) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    bindings
        .iter()
        .fold(sqlx::query(sql), |query, value| bind_value(query, value))
}

/// Convert one row by the storage class of each cell
fn row_to_mapping(row: &SqliteRow) -> Result<RowMapping, sqlx::Error> {
    let mut mapping = RowMapping::with_capacity(row.columns().len());

    for column in row.columns() {
        let index = column.ordinal();
        let raw = row.try_get_raw(index)?;

        let value = if raw.is_null() {
            Value::Null
        } else {
            let type_name = raw.type_info().name().to_ascii_uppercase();
            match type_name.as_str() {
                "INTEGER" | "INT" | "BIGINT" | "INT8" | "BOOLEAN" | "BOOL" => {
                    Value::Integer(row.try_get_unchecked::<i64, _>(index)?)
                }
                "REAL" | "FLOAT" | "DOUBLE" => Value::Real(row.try_get_unchecked::<f64, _>(index)?),
                "BLOB" => Value::Blob(row.try_get_unchecked::<Vec<u8>, _>(index)?),
                _ => Value::Text(row.try_get_unchecked::<String, _>(index)?),
            }
        };

        mapping.insert(column.name().to_string(), value);
    }

    Ok(mapping)
}

#[async_trait]
impl StatementExecutor for SqliteExecutor {
    type Error = sqlx::Error;

    async fn execute(&self, statement: &Statement) -> Result<u64, Self::Error> {
        debug_log!("executing: {}", statement.sql);
        let result = build_query(&statement.sql, &statement.bindings)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn fetch_rows(&self, sql: &str, bindings: &[Value]) -> Result<Vec<RowMapping>, Self::Error> {
        debug_log!("fetching: {}", sql);
        let rows = build_query(sql, bindings).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_mapping).collect()
    }
}
