//! MCP Common - Shared utilities for MCP servers
//!
//! This crate provides the plumbing every server in the workspace needs:
//!
//! - **Initialization**: [`init_tracing`] and [`serve_stdio`] for startup
//! - **Results**: helpers for building tool and resource responses
//! - **Errors**: [`Classified`] / [`IntoMcpError`] for mapping domain errors
//!
//! # Example
//!
//! ```rust,ignore
//! use mcp_common::{init_tracing, json_success, serve_stdio};
//!
//! init_tracing("my_mcp")?;
//! let server = MyServer::connect(&config)?;
//! serve_stdio(server, "my_mcp").await?;
//! ```

pub mod error;
pub mod init;
pub mod result;

// Re-export commonly used items at crate root
pub use error::{Classified, ErrorClass, IntoMcpError, ResultExt};
pub use init::{init_tracing, serve_stdio};
pub use result::{json_resource, json_success};

// Re-export rmcp types that are commonly needed
pub use rmcp::{
    model::{CallToolResult, ReadResourceResult},
    ErrorData as McpError,
};
