//! Drug tools MCP server entry point.
//!
//! Loads configuration, opens the drug store, starts the tool server and
//! serves it over the configured transport.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt};

use drug_tools_mcp_server::core::{Config, McpServer, ServerLifecycle, TransportService};
use drug_tools_mcp_server::domains::drugs::open_store;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    init_logging(&config.logging.level, config.logging.with_timestamps);

    info!("Starting {} v{}", config.server.name, config.server.version);

    let store = open_store(&config.data).context("Failed to open drug data store")?;
    let lifecycle = Arc::new(ServerLifecycle::new(store));

    // A tool server that fails to start is reported, not fatal: the
    // transport still answers and health reports it as unavailable.
    if let Err(e) = lifecycle.start().await {
        error!("Tool server did not start: {}", e);
    }

    let server = McpServer::new(config.clone(), lifecycle.clone());
    let transport = TransportService::new(config.transport);
    let outcome = transport.run(server).await;

    lifecycle.stop().await?;
    outcome?;

    info!("Server shutting down");
    Ok(())
}

/// Initialize the logging subsystem. Output goes to stderr.
fn init_logging(level: &str, with_timestamps: bool) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
