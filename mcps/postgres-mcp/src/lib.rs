//! Postgres MCP Library
//!
//! Exposes a PostgreSQL database over MCP: each table of one schema is a
//! resource describing its columns, and the `query` tool runs SQL inside a
//! read-only transaction that is always rolled back.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use postgres_mcp::{ConnectionManager, PostgresConfig, PostgresMcpServer, ResourceBase};
//!
//! let config = PostgresConfig::load(None)?.with_overrides(Some(url), None, None);
//! let target = config.target()?;
//! let manager = ConnectionManager::new(&target, &config.pool)?;
//! let server = PostgresMcpServer::new(manager, ResourceBase::new(target.resource_base()), "public");
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod params;
pub mod resources;
pub mod server;

pub use config::{ConfigError, ConnectionTarget, PostgresConfig};
pub use db::{ConnectionManager, QueryResult, SafeQueryExecutor};
pub use error::{DbError, ResetWarning, RollbackWarning};
pub use params::QueryParams;
pub use resources::ResourceBase;
pub use server::PostgresMcpServer;
