//! MCP server handler.
//!
//! Bridges the rmcp protocol layer to the tool lifecycle. Tool definitions
//! and call results are converted here, so the tools domain never depends
//! on rmcp types.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::lifecycle::{ServerLifecycle, ServerStatus};
use crate::domains::tools::{ContentBlock, ToolCallRequest, ToolCallResult, ToolDefinition};

/// The main MCP server handler.
///
/// Clones share one lifecycle; the TCP transport hands a clone to every
/// connection.
#[derive(Debug, Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Tool server state and dispatcher.
    lifecycle: Arc<ServerLifecycle>,
}

impl McpServer {
    /// Create a server handler over an existing lifecycle.
    pub fn new(config: Config, lifecycle: Arc<ServerLifecycle>) -> Self {
        Self {
            config: Arc::new(config),
            lifecycle,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn lifecycle(&self) -> &Arc<ServerLifecycle> {
        &self.lifecycle
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// Advertised tools in `tools/list` wire form.
    pub async fn tool_catalog(&self) -> Vec<serde_json::Value> {
        self.lifecycle
            .list_tools()
            .await
            .iter()
            .map(ToolDefinition::to_json)
            .collect()
    }

    /// Dispatch a tool call.
    pub async fn dispatch_tool(&self, name: &str, arguments: serde_json::Value) -> ToolCallResult {
        self.lifecycle
            .call_tool(ToolCallRequest::new(name, arguments))
            .await
    }

    pub async fn status(&self) -> ServerStatus {
        self.lifecycle.status().await
    }
}

/// Convert a tool definition into its rmcp form.
fn to_mcp_tool(definition: &ToolDefinition) -> Tool {
    Tool::new(
        definition.name.clone(),
        definition.description.clone(),
        Arc::new(definition.parameter_schema.to_json_schema()),
    )
}

/// Convert a dispatch envelope into an rmcp call result.
fn to_call_tool_result(result: ToolCallResult) -> CallToolResult {
    let success = result.is_success();
    let content = result
        .payload
        .into_iter()
        .map(|block| match block {
            ContentBlock::Text { text } => Content::text(text),
        })
        .collect();

    if success {
        CallToolResult::success(content)
    } else {
        CallToolResult::error(content)
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Drug information tools: search drugs, read label details, find drugs by \
                 condition, check interactions, compare drugs and find related products."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        info!("Listing tools");
        let tools = self.lifecycle.list_tools().await;
        Ok(ListToolsResult {
            tools: tools.iter().map(to_mcp_tool).collect(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, request, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let arguments = request
            .arguments
            .map(serde_json::Value::Object)
            .unwrap_or_else(|| serde_json::Value::Object(Default::default()));
        let result = self.dispatch_tool(&request.name, arguments).await;
        Ok(to_call_tool_result(result))
    }
}
