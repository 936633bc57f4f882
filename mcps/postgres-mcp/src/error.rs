//! Error taxonomy for database access

use mcp_common::{Classified, ErrorClass};
use serde_json::json;
use thiserror::Error;

/// Failures surfaced to callers of the connection manager, the executor and
/// the catalog
#[derive(Debug, Error)]
pub enum DbError {
    /// No connection could be leased from the pool
    #[error("connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// The database rejected or failed the statement
    #[error("{}", database_message(.0))]
    Query(#[source] sqlx::Error),

    /// A resource URI that does not address a table schema
    #[error("invalid resource URI: {0}")]
    InvalidResource(String),
}

impl DbError {
    /// SQLSTATE reported by the server, when the failure came from it
    pub fn sqlstate(&self) -> Option<String> {
        match self {
            DbError::Query(sqlx::Error::Database(e)) => e.code().map(|c| c.into_owned()),
            _ => None,
        }
    }
}

/// The server's own message for database errors, sqlx's rendering otherwise
fn database_message(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(e) => e.message().to_string(),
        other => other.to_string(),
    }
}

impl Classified for DbError {
    fn class(&self) -> ErrorClass {
        match self {
            DbError::InvalidResource(_) => ErrorClass::InvalidParams,
            DbError::Connection(_) | DbError::Query(_) => ErrorClass::Internal,
        }
    }

    fn data(&self) -> Option<serde_json::Value> {
        self.sqlstate().map(|code| json!({ "sqlstate": code }))
    }
}

/// Rollback failed after the query ran
///
/// Diagnostic only. It is logged and carried next to the primary outcome,
/// never returned in its place.
#[derive(Debug, Error)]
#[error("could not roll back transaction: {0}")]
pub struct RollbackWarning(#[source] pub sqlx::Error);

/// Session state could not be reset before the connection went back
///
/// Like [`RollbackWarning`] it never replaces the outcome. The connection is
/// closed instead of being reused.
#[derive(Debug, Error)]
#[error("could not reset session: {0}")]
pub struct ResetWarning(#[source] pub sqlx::Error);
