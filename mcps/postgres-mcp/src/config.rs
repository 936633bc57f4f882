//! Configuration for the Postgres MCP server
//!
//! Settings come from an optional TOML file, looked up in order:
//! 1. an explicit `--config` path
//! 2. the `POSTGRES_MCP_CONFIG` environment variable
//! 3. `~/.binks/postgres.toml`
//!
//! Command-line values override the file. The connection URL is resolved
//! once at startup by [`ConnectionTarget::resolve`].

use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// Database used when the connection URL names none
pub const DEFAULT_DATABASE: &str = "postgres";

/// Account used when the connection URL names none
pub const DEFAULT_USER: &str = "postgres";

const CONFIG_ENV: &str = "POSTGRES_MCP_CONFIG";

/// Configuration errors, all fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no database URL given (pass it as an argument or set DATABASE_URL)")]
    MissingUrl,

    #[error("malformed database URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("unsupported URL scheme '{0}', expected postgres:// or postgresql://")]
    UnsupportedScheme(String),

    #[error("database URL has no host")]
    MissingHost,

    #[error("invalid connection options: {0}")]
    Options(#[source] sqlx::Error),

    #[error("failed to read config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Postgres MCP configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostgresConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub pool: PoolConfig,
}

/// Which database to expose
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL; the command line or `DATABASE_URL` wins over this
    #[serde(default)]
    pub url: Option<String>,

    /// Schema whose tables are listed as resources
    /// Default: public
    #[serde(default = "default_schema")]
    pub schema: String,
}

/// Connection pool limits
#[derive(Debug, Clone, Deserialize)]
pub struct PoolConfig {
    /// Upper bound on concurrently open connections
    /// Default: 5
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long a caller waits for a free connection before giving up
    /// Default: 30
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Close connections idle for longer than this
    #[serde(default)]
    pub idle_timeout_secs: Option<u64>,
}

fn default_schema() -> String {
    "public".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    30
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            schema: default_schema(),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            idle_timeout_secs: None,
        }
    }
}

impl PostgresConfig {
    /// Load configuration from file, falling back to defaults
    ///
    /// An explicitly named file must exist. The implicit locations are
    /// optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::find_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::info!("Loading config from: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }

        dirs::home_dir().map(|home| home.join(".binks").join("postgres.toml"))
    }

    /// Apply command-line values on top of the file
    pub fn with_overrides(
        mut self,
        url: Option<String>,
        schema: Option<String>,
        max_connections: Option<u32>,
    ) -> Self {
        if url.is_some() {
            self.database.url = url;
        }
        if let Some(schema) = schema {
            self.database.schema = schema;
        }
        if let Some(max) = max_connections {
            self.pool.max_connections = max;
        }
        self
    }

    /// Resolve the configured URL into a connection target
    pub fn target(&self) -> Result<ConnectionTarget, ConfigError> {
        let url = self.database.url.as_deref().ok_or(ConfigError::MissingUrl)?;
        ConnectionTarget::resolve(url)
    }
}

/// A fully defaulted connection descriptor
///
/// Holds the credential, so it is never logged directly; use
/// [`ConnectionTarget::redacted`].
#[derive(Clone)]
pub struct ConnectionTarget {
    url: Url,
}

impl ConnectionTarget {
    /// Parse a connection URL and fill in the default database and account
    pub fn resolve(raw: &str) -> Result<Self, ConfigError> {
        let mut url = Url::parse(raw)?;

        if !matches!(url.scheme(), "postgres" | "postgresql") {
            return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingHost);
        }

        if url.username().is_empty() {
            url.set_username(DEFAULT_USER)
                .map_err(|_| ConfigError::MissingHost)?;
        }

        if url.path().trim_start_matches('/').is_empty() {
            url.set_path(DEFAULT_DATABASE);
        }

        Ok(Self { url })
    }

    /// Options for the sqlx pool
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        PgConnectOptions::from_str(self.url.as_str()).map_err(ConfigError::Options)
    }

    /// Base URL resource URIs are built from: `postgres` scheme, no password
    pub fn resource_base(&self) -> Url {
        let mut base = self.url.clone();
        // Both schemes are non-special, so switching between them cannot fail.
        let _ = base.set_scheme("postgres");
        let _ = base.set_password(None);
        base
    }

    /// The URL with its password masked, for logs
    pub fn redacted(&self) -> String {
        let mut shown = self.url.clone();
        if shown.password().is_some() {
            let _ = shown.set_password(Some("****"));
        }
        shown.to_string()
    }
}

impl std::fmt::Debug for ConnectionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionTarget")
            .field("url", &self.redacted())
            .finish()
    }
}
