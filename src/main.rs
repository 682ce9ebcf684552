//! PostgREST MCP Server - Main entry point.
//!
//! This server provides MCP (Model Context Protocol) tools for AI assistants
//! to read and write tables through a PostgREST-compatible API (Supabase).

use postgrest_mcp_server::config::{Config, TransportMode};
use postgrest_mcp_server::rest::RestClient;
use postgrest_mcp_server::transport::{HttpTransport, StdioTransport, Transport};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs always go to stderr; stdout carries the stdio transport.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_directive()));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from command line and environment
    let config = Config::parse_args();

    init_tracing(&config);

    info!(
        transport = %config.transport,
        rate_limit_ms = config.rate_limit_ms,
        "Starting PostgREST MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let client = Arc::new(RestClient::from_config(&config)?);

    // Resolution happens again on every request; this only warns early
    match client.resolver().resolve() {
        Ok(remote) => info!(base_url = %remote.base_url, "PostgREST endpoint configured"),
        Err(e) => warn!(error = %e, "PostgREST endpoint not configured yet; tool calls will fail"),
    }

    let result = match config.transport {
        TransportMode::Stdio => {
            info!("Using stdio transport");
            let transport = StdioTransport::new(client);
            transport.run().await
        }
        TransportMode::Http => {
            info!(
                host = %config.http_host,
                port = config.http_port,
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            let transport = HttpTransport::new(
                client,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            );
            transport.run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        eprintln!("Fatal: {}", e);
        std::process::exit(1);
    }

    info!("Server shutdown complete");
    Ok(())
}
