//! Table and column metadata
//!
//! Fixed SQL with bound parameters, run on a plain lease without the
//! executor's read-only envelope.

use serde::Serialize;
use sqlx::FromRow;

use super::pool::ConnectionManager;
use crate::error::DbError;

/// One column of a table, as `information_schema` reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ColumnSchema {
    pub column_name: String,
    pub data_type: String,
}

/// Looks up tables and columns in one schema
#[derive(Clone, Debug)]
pub struct Catalog {
    manager: ConnectionManager,
    schema: String,
}

impl Catalog {
    pub fn new(manager: ConnectionManager, schema: impl Into<String>) -> Self {
        Self {
            manager,
            schema: schema.into(),
        }
    }

    /// Schema whose tables this catalog lists
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Names of the schema's base tables; views and foreign tables are left out
    pub async fn list_tables(&self) -> Result<Vec<String>, DbError> {
        let mut lease = self.manager.acquire().await?;

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT table_name::text FROM information_schema.tables \
             WHERE table_schema = $1 AND table_type = 'BASE TABLE' \
             ORDER BY table_name",
        )
        .bind(&self.schema)
        .fetch_all(&mut *lease)
        .await
        .map_err(DbError::Query)?;

        self.manager.release(lease);
        Ok(tables.into_iter().map(|(name,)| name).collect())
    }

    /// Columns of `table` in declaration order; empty for an unknown table
    pub async fn table_columns(&self, table: &str) -> Result<Vec<ColumnSchema>, DbError> {
        let mut lease = self.manager.acquire().await?;

        let columns = sqlx::query_as::<_, ColumnSchema>(
            "SELECT column_name::text AS column_name, data_type::text AS data_type \
             FROM information_schema.columns \
             WHERE table_schema = $1 AND table_name = $2 \
             ORDER BY ordinal_position",
        )
        .bind(&self.schema)
        .bind(table)
        .fetch_all(&mut *lease)
        .await
        .map_err(DbError::Query)?;

        self.manager.release(lease);
        Ok(columns)
    }
}
