// Standalone Coolify MCP server binary

use anyhow::{Context, Result};
use coolify_client::{ClientConfig, HttpTransport};
use coolify_mcp::dispatch::Dispatcher;
use coolify_mcp::server::McpServer;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the protocol.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::info!("Coolify MCP server starting...");

    // Both settings are required; refuse to serve without them.
    let config = ClientConfig::from_env()
        .context("COOLIFY_BASE_URL and COOLIFY_API_TOKEN must be set")?;
    tracing::info!(base_url = %config.base_url, "configured");

    let transport = HttpTransport::new(Arc::new(config))?;
    let dispatcher = Dispatcher::new(Arc::new(transport));

    let server = McpServer::new(dispatcher);
    server.start().await?;

    Ok(())
}
