//! Resource URIs for table schemas
//!
//! A table's schema lives at `<base>/<table>/schema`, where the base is the
//! connection URL with a `postgres` scheme and no password.

use url::Url;

use crate::error::DbError;

/// Final path segment of every schema resource
pub const SCHEMA_PATH: &str = "schema";

/// Mime type of schema resource bodies
pub const SCHEMA_MIME_TYPE: &str = "application/json";

/// Builds and parses table schema URIs under one base URL
#[derive(Debug, Clone)]
pub struct ResourceBase {
    base: Url,
}

impl ResourceBase {
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// URI of `table`'s schema resource
    pub fn table_uri(&self, table: &str) -> Result<Url, DbError> {
        let relative = format!("{}/{}", urlencoding::encode(table), SCHEMA_PATH);
        self.base
            .join(&relative)
            .map_err(|e| DbError::InvalidResource(format!("{}: {}", table, e)))
    }

    /// Display name of `table`'s schema resource
    pub fn table_name(table: &str) -> String {
        format!("\"{}\" database schema", table)
    }

    /// Table addressed by a schema URI
    pub fn parse_table(uri: &str) -> Result<String, DbError> {
        let invalid = || DbError::InvalidResource(uri.to_string());

        let url = Url::parse(uri).map_err(|_| invalid())?;
        let mut segments = url.path_segments().ok_or_else(invalid)?.rev();

        if segments.next() != Some(SCHEMA_PATH) {
            return Err(invalid());
        }

        let table = segments.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
        let table = urlencoding::decode(table).map_err(|_| invalid())?;

        Ok(table.into_owned())
    }
}
