//! Drug Tools MCP Server
//!
//! A Model Context Protocol server exposing drug-information tools: text
//! search, label details, condition lookup, interaction data, side-by-side
//! comparison and related products.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, tool server lifecycle, the
//!   rmcp handler and transports
//! - **domains**: business logic organized by bounded contexts
//!   - **drugs**: the read-only drug data capability (in-memory or REST)
//!   - **tools**: tool registry, handlers and the dispatcher
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use drug_tools_mcp_server::core::{Config, McpServer, ServerLifecycle};
//! use drug_tools_mcp_server::domains::drugs::open_store;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let lifecycle = Arc::new(ServerLifecycle::new(open_store(&config.data)?));
//!     lifecycle.start().await?;
//!     let server = McpServer::new(config, lifecycle);
//!     // Serve it over a transport...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
