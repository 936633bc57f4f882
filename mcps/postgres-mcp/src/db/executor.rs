//! Safe query executor
//!
//! Runs caller-supplied SQL so that nothing it does can persist:
//!
//! 1. lease a connection
//! 2. put the session in server-enforced read-only mode
//! 3. `BEGIN`
//! 4. run the SQL verbatim as one statement and collect all rows
//! 5. `ROLLBACK`, whatever happened in 2-4
//! 6. reset session state the rollback leaves behind
//! 7. release the connection, whatever happened in 2-6
//!
//! The read-only boundary is the server's. SQL text is never inspected.

use super::pool::ConnectionManager;
use super::rows::QueryResult;
use super::session::{PgSession, ReadOnlySession};
use crate::error::{DbError, ResetWarning, RollbackWarning};

/// Failures while putting the session back in order
#[derive(Debug, Default)]
pub struct Cleanup {
    pub rollback: Option<RollbackWarning>,
    pub reset: Option<ResetWarning>,
}

impl Cleanup {
    pub fn is_clean(&self) -> bool {
        self.rollback.is_none() && self.reset.is_none()
    }
}

/// What one guarded run produced
///
/// `outcome` is what the caller sees. `cleanup` records failed rollback or
/// reset steps, which are reported but never take the outcome's place.
#[derive(Debug)]
pub struct Execution {
    pub outcome: Result<QueryResult, DbError>,
    pub cleanup: Cleanup,
}

impl Execution {
    /// The primary outcome, with any cleanup failure dropped after logging
    pub fn into_result(self) -> Result<QueryResult, DbError> {
        if let Some(warning) = &self.cleanup.rollback {
            tracing::warn!(error = %warning, "Rollback failed, returning query outcome");
        }
        if let Some(warning) = &self.cleanup.reset {
            tracing::warn!(error = %warning, "Session reset failed, returning query outcome");
        }
        self.outcome
    }
}

/// Executes one query at a time per leased connection under the read-only envelope
#[derive(Clone, Debug)]
pub struct SafeQueryExecutor {
    manager: ConnectionManager,
}

impl SafeQueryExecutor {
    pub fn new(manager: ConnectionManager) -> Self {
        Self { manager }
    }

    /// Run `sql` read-only and return its rows
    ///
    /// Fails with [`DbError::Connection`] when no connection can be leased and
    /// [`DbError::Query`] when the database rejects the statement, including
    /// any write attempt.
    pub async fn execute(&self, sql: &str) -> Result<QueryResult, DbError> {
        let mut lease = self.manager.acquire().await?;

        // The session drops before the lease, also when this future is
        // cancelled, so a dirty connection is marked for closing first.
        let execution = {
            let mut session = PgSession::new(&mut lease);
            run_guarded(&mut session, sql).await
        };

        self.manager.release(lease);

        execution.into_result()
    }
}

/// The execute-safely protocol against any session
///
/// Rollback is attempted on every path, including when read-only setup or
/// `BEGIN` failed. The session is reset only after a successful rollback;
/// otherwise it stays dirty and its connection is closed. Either failure
/// only ever lands in [`Execution::cleanup`].
pub async fn run_guarded<S>(session: &mut S, sql: &str) -> Execution
where
    S: ReadOnlySession + ?Sized,
{
    let outcome = run_statement(session, sql).await;

    if let Err(e) = &outcome {
        tracing::debug!(error = %e, "Query failed");
    }

    let mut cleanup = Cleanup::default();
    match session.rollback().await {
        Ok(()) => cleanup.reset = session.reset().await.err().map(ResetWarning),
        Err(e) => cleanup.rollback = Some(RollbackWarning(e)),
    }

    Execution { outcome, cleanup }
}

async fn run_statement<S>(session: &mut S, sql: &str) -> Result<QueryResult, DbError>
where
    S: ReadOnlySession + ?Sized,
{
    session.enforce_read_only().await.map_err(DbError::Query)?;
    session.begin().await.map_err(DbError::Query)?;
    let result = session.run(sql).await.map_err(DbError::Query)?;
    tracing::debug!(rows = result.row_count, "Query succeeded");
    Ok(result)
}
