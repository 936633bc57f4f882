//! Parameter definitions for postgres-mcp tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the query tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueryParams {
    /// A single SQL statement. It runs in a read-only transaction that is
    /// always rolled back.
    pub sql: String,
}
