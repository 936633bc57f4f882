//! MCP Server implementation for PostgreSQL
//!
//! Exposes the `query` tool and one schema resource per table. Handler
//! implementations are in the handlers module.

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, ListResourcesResult, PaginatedRequestParam, ReadResourceRequestParam,
        ReadResourceResult, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer,
};

use crate::db::{Catalog, ConnectionManager, SafeQueryExecutor};
use crate::handlers;
use crate::params::QueryParams;
use crate::resources::ResourceBase;

/// The main Postgres MCP Server
#[derive(Clone)]
pub struct PostgresMcpServer {
    executor: SafeQueryExecutor,
    catalog: Catalog,
    resources: ResourceBase,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl PostgresMcpServer {
    /// Build a server over `manager`, listing tables of `schema`
    ///
    /// Resource URIs are built under `resources`.
    pub fn new(manager: ConnectionManager, resources: ResourceBase, schema: impl Into<String>) -> Self {
        Self {
            executor: SafeQueryExecutor::new(manager.clone()),
            catalog: Catalog::new(manager, schema),
            resources,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Run a read-only SQL query")]
    async fn query(
        &self,
        Parameters(params): Parameters<QueryParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::query(&self.executor, params).await
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for PostgresMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(format!(
                "PostgreSQL MCP server. Every table in schema '{}' is a resource \
                 describing its columns. Use the query tool to run SQL; statements \
                 run in a read-only transaction that is always rolled back, so \
                 writes are rejected by the database.",
                self.catalog.schema()
            )),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        handlers::list_resources(&self.catalog, &self.resources).await
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        handlers::read_resource(&self.catalog, &request.uri).await
    }
}
