//! Server initialization utilities
//!
//! Tracing setup and the stdio serve loop shared by all servers.

use rmcp::{transport::stdio, RoleServer, ServerHandler, ServiceExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging for MCP servers
///
/// Logs go to stderr, stdout carries the MCP protocol. The filter comes from
/// `RUST_LOG` with `<crate_name>=info` added on top.
///
/// Set `LOG_FORMAT=json` for structured JSON output.
pub fn init_tracing(crate_name: &str) -> anyhow::Result<()> {
    let directive = format!("{}=info", crate_name);
    let filter = EnvFilter::from_default_env().add_directive(directive.parse()?);

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init();
    }

    Ok(())
}

/// Serve an already constructed server over stdio until the client hangs up
///
/// Servers that need async or fallible setup (database pools, parsed
/// configuration) build themselves first and hand the result here.
pub async fn serve_stdio<S>(server: S, name: &str) -> anyhow::Result<()>
where
    S: ServerHandler,
{
    tracing::info!(server = name, "Serving MCP over stdio");

    let service = ServiceExt::<RoleServer>::serve(server, stdio()).await?;

    tracing::info!(server = name, "Server running, waiting for requests...");

    let reason = service.waiting().await?;

    tracing::info!(server = name, ?reason, "Server shutting down");
    Ok(())
}
