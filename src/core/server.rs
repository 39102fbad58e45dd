//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating tool calls to the `ToolRegistry`.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` and bound by name in
//! `domains/tools/registry.rs`. The ToolRouter is built from the registry in
//! `domains/tools/router.rs`, so adding a tool does not touch this file.

use rmcp::{
    ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler,
};
use std::sync::Arc;

#[cfg(feature = "http")]
use rmcp::ErrorData as McpError;

use super::config::Config;
use super::error;
use crate::domains::{
    tools::{ToolRegistry, build_tool_router},
    whatsapp::WhatsAppManager,
};

/// Instructions advertised to MCP clients.
pub const SERVER_INSTRUCTIONS: &str = "This server sends WhatsApp messages through the WhatsApp Business Cloud API. \
     Use wa_send_template to start a conversation; free-form messages (text, media, location, contacts) \
     are only delivered within 24 hours of the user's last message.";

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and routes
/// tool calls to the WhatsApp tool registry.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Name-indexed tool bindings.
    registry: Arc<ToolRegistry>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the WhatsApp access token or
    /// phone-number id is missing.
    pub fn new(config: Config) -> error::Result<Self> {
        let manager = WhatsAppManager::new(&config.whatsapp)?;
        Ok(Self::with_manager(config, manager))
    }

    /// Create a server around an already-built manager.
    pub fn with_manager(config: Config, manager: WhatsAppManager) -> Self {
        let registry = Arc::new(ToolRegistry::new(Arc::new(manager)));

        Self {
            tool_router: build_tool_router::<Self>(registry.clone()),
            config: Arc::new(config),
            registry,
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

    /// Get the tool registry.
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    ///
    /// Returns the MCP `CallToolResult` serialized as JSON.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> std::result::Result<serde_json::Value, McpError> {
        let result = self.registry.call_tool_result(name, arguments).await?;
        serde_json::to_value(result).map_err(|e| McpError::internal_error(e.to_string(), None))
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
