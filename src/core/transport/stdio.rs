//! STDIO transport implementation.
//!
//! The default MCP mode: one client, speaking JSON-RPC over stdin/stdout.
//! Logs go to stderr so they never corrupt the protocol stream.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Serve a single client until stdin closes.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!("Ready - {} communicating via stdin/stdout", server.name());

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        let reason = service
            .waiting()
            .await
            .map_err(|e| TransportError::ServiceError(e.to_string()))?;

        info!("STDIO transport finished: {:?}", reason);
        Ok(())
    }
}
