//! Database access: pooled connections, the read-only executor, and catalog
//! lookups

pub mod catalog;
pub mod executor;
pub mod pool;
pub mod rows;
pub mod session;

pub use catalog::{Catalog, ColumnSchema};
pub use executor::{run_guarded, Cleanup, Execution, SafeQueryExecutor};
pub use pool::{ConnectionManager, Lease};
pub use rows::{ColumnInfo, QueryResult};
pub use session::{PgSession, ReadOnlySession};
