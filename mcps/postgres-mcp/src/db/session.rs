//! Database sessions the executor drives
//!
//! [`ReadOnlySession`] is the seam between the execute-safely protocol and
//! the wire: [`PgSession`] speaks to PostgreSQL over a leased connection,
//! tests script their own.

use async_trait::async_trait;
use sqlx::{Connection, Executor};

use super::pool::Lease;
use super::rows::{self, QueryResult};

/// Steps the executor runs against one exclusively held connection
#[async_trait]
pub trait ReadOnlySession: Send {
    /// Switch the session into server-enforced read-only mode
    async fn enforce_read_only(&mut self) -> Result<(), sqlx::Error>;

    /// Open an explicit transaction
    async fn begin(&mut self) -> Result<(), sqlx::Error>;

    /// Run caller-supplied SQL as a single statement and collect every row
    async fn run(&mut self, sql: &str) -> Result<QueryResult, sqlx::Error>;

    /// Discard whatever the transaction did
    async fn rollback(&mut self) -> Result<(), sqlx::Error>;

    /// Drop session state a rollback does not undo: advisory locks, prepared
    /// statements, listeners, temporary tables, settings
    async fn reset(&mut self) -> Result<(), sqlx::Error>;
}

/// A PostgreSQL session on a leased connection
///
/// The connection only counts as clean once [`reset`](ReadOnlySession::reset)
/// has succeeded. A session dropped before that (a failed cleanup, or a
/// request cancelled mid-flight) marks its lease to be closed rather than
/// returned, so no open transaction or leftover session state re-enters the
/// pool and the slot is still freed.
pub struct PgSession<'a> {
    lease: &'a mut Lease,
    dirty: bool,
}

impl<'a> PgSession<'a> {
    pub fn new(lease: &'a mut Lease) -> Self {
        Self { lease, dirty: false }
    }
}

#[async_trait]
impl ReadOnlySession for PgSession<'_> {
    async fn enforce_read_only(&mut self) -> Result<(), sqlx::Error> {
        self.dirty = true;
        (&mut **self.lease)
            .execute("SET SESSION CHARACTERISTICS AS TRANSACTION READ ONLY")
            .await?;
        Ok(())
    }

    async fn begin(&mut self) -> Result<(), sqlx::Error> {
        self.dirty = true;
        (&mut **self.lease).execute("BEGIN TRANSACTION READ ONLY").await?;
        Ok(())
    }

    async fn run(&mut self, sql: &str) -> Result<QueryResult, sqlx::Error> {
        // Prepared, so the server refuses more than one statement. Not cached:
        // every caller string is different.
        let fetched = sqlx::query(sql)
            .persistent(false)
            .fetch_all(&mut **self.lease)
            .await?;
        let mut result = rows::collect(&fetched)?;

        if fetched.is_empty() {
            // No row to read column metadata from; ask the server instead.
            match (&mut **self.lease).describe(sql).await {
                Ok(described) => result.columns = rows::describe_columns(described.columns()),
                Err(e) => tracing::debug!(error = %e, "Could not describe empty result"),
            }
        }

        Ok(result)
    }

    async fn rollback(&mut self) -> Result<(), sqlx::Error> {
        (&mut **self.lease).execute("ROLLBACK").await?;
        Ok(())
    }

    async fn reset(&mut self) -> Result<(), sqlx::Error> {
        // Caller SQL may have deallocated statements sqlx still has cached.
        self.lease.clear_cached_statements().await?;
        (&mut **self.lease).execute("DISCARD ALL").await?;
        self.dirty = false;
        Ok(())
    }
}

impl Drop for PgSession<'_> {
    fn drop(&mut self) {
        if self.dirty {
            tracing::warn!("Session left without a clean reset, discarding connection");
            self.lease.discard_on_release();
        }
    }
}
