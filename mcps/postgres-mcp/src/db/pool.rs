//! Connection manager
//!
//! Owns the bounded sqlx pool and leases single connections out of it.
//! A lease returns its connection to the pool when dropped, so every exit
//! path of an operation releases exactly once.

use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnection, PgPoolOptions};
use sqlx::{PgPool, Postgres};
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use crate::config::{ConfigError, ConnectionTarget, PoolConfig};
use crate::error::DbError;

/// Hands out exclusive, short-lived access to pooled connections
///
/// Cheap to clone; clones share one pool.
#[derive(Clone, Debug)]
pub struct ConnectionManager {
    pool: PgPool,
}

impl ConnectionManager {
    /// Build the pool for `target` without connecting
    ///
    /// Connections are opened on demand, so an unreachable server shows up as
    /// [`DbError::Connection`] on the first [`acquire`](Self::acquire) rather
    /// than at startup.
    pub fn new(target: &ConnectionTarget, config: &PoolConfig) -> Result<Self, ConfigError> {
        let options = target.connect_options()?;

        let mut pool_options = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs));
        if let Some(secs) = config.idle_timeout_secs {
            pool_options = pool_options.idle_timeout(Duration::from_secs(secs));
        }
        let pool = pool_options.connect_lazy_with(options);

        tracing::info!(
            url = %target.redacted(),
            max_connections = config.max_connections,
            "Connection pool configured"
        );

        Ok(Self { pool })
    }

    /// Lease one connection, waiting while the pool is exhausted
    pub async fn acquire(&self) -> Result<Lease, DbError> {
        let conn = self.pool.acquire().await.map_err(DbError::Connection)?;
        tracing::debug!(size = self.size(), idle = self.idle(), "Connection leased");
        Ok(Lease { conn })
    }

    /// Return a lease to the pool
    ///
    /// Dropping the lease does the same; this spelling exists for call sites
    /// that want the release to be visible.
    pub fn release(&self, lease: Lease) {
        drop(lease);
        tracing::debug!(size = self.size(), idle = self.idle(), "Connection released");
    }

    /// Connections currently open, leased or idle
    pub fn size(&self) -> u32 {
        self.pool.size()
    }

    /// Connections open and waiting in the pool
    pub fn idle(&self) -> usize {
        self.pool.num_idle()
    }

    /// Close every connection and refuse further leases
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Connection pool closed");
    }
}

/// An exclusively owned connection leased from the pool
pub struct Lease {
    conn: PoolConnection<Postgres>,
}

impl Lease {
    /// Close the connection instead of returning it once the lease drops
    ///
    /// The pool slot is freed either way and a replacement is opened on
    /// demand. Used when the session state can no longer be trusted.
    pub fn discard_on_release(&mut self) {
        self.conn.close_on_drop();
    }
}

impl Deref for Lease {
    type Target = PgConnection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl DerefMut for Lease {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}
