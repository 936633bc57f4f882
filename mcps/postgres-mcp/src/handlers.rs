//! Handler implementations for postgres-mcp tools and resources
//!
//! Each handler calls into the database layer and shapes the result for MCP.

use mcp_common::{json_resource, json_success, CallToolResult, McpError, ReadResourceResult, ResultExt};
use rmcp::model::{AnnotateAble, ListResourcesResult, RawResource, Resource};

use crate::db::{Catalog, SafeQueryExecutor};
use crate::error::DbError;
use crate::params::QueryParams;
use crate::resources::{ResourceBase, SCHEMA_MIME_TYPE};

pub async fn query(
    executor: &SafeQueryExecutor,
    params: QueryParams,
) -> Result<CallToolResult, McpError> {
    let result = executor.execute(&params.sql).await.to_mcp_err()?;
    json_success(&result)
}

pub async fn list_resources(
    catalog: &Catalog,
    base: &ResourceBase,
) -> Result<ListResourcesResult, McpError> {
    let tables = catalog.list_tables().await.to_mcp_err()?;

    let resources = tables
        .iter()
        .map(|table| table_resource(base, table))
        .collect::<Result<Vec<_>, _>>()
        .to_mcp_err()?;

    Ok(ListResourcesResult::with_all_items(resources))
}

pub async fn read_resource(catalog: &Catalog, uri: &str) -> Result<ReadResourceResult, McpError> {
    let table = ResourceBase::parse_table(uri).to_mcp_err()?;
    let columns = catalog.table_columns(&table).await.to_mcp_err()?;
    json_resource(uri, &columns)
}

fn table_resource(base: &ResourceBase, table: &str) -> Result<Resource, DbError> {
    let uri = base.table_uri(table)?;
    let mut raw = RawResource::new(uri.as_str(), ResourceBase::table_name(table));
    raw.mime_type = Some(SCHEMA_MIME_TYPE.to_string());
    Ok(raw.no_annotation())
}
