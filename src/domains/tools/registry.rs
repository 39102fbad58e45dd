//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - `ToolName`, the closed set of tools this server exposes
//! - Dispatch of `(name, raw arguments)` to the bound tool
//! - Tool metadata for listing

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rmcp::{ErrorData as McpError, model::CallToolResult, model::Tool};
use serde_json::Value;

use super::ToolError;
use super::definitions::common::{dispatch, into_call_result};
use super::definitions::{
    GetBusinessProfileTool, MarkMessageAsReadTool, SendContactTool, SendDocumentTool,
    SendImageTool, SendLocationTool, SendTemplateTool, SendTextTool, SendVideoTool, WhatsAppTool,
};
use crate::domains::whatsapp::WhatsAppManager;

// ============================================================================
// Tool Names
// ============================================================================

/// Every tool exposed by this server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    SendText,
    SendTemplate,
    SendImage,
    SendVideo,
    SendDocument,
    SendLocation,
    SendContact,
    MarkMessageAsRead,
    GetBusinessProfile,
}

impl ToolName {
    pub const ALL: [ToolName; 9] = [
        Self::SendText,
        Self::SendTemplate,
        Self::SendImage,
        Self::SendVideo,
        Self::SendDocument,
        Self::SendLocation,
        Self::SendContact,
        Self::MarkMessageAsRead,
        Self::GetBusinessProfile,
    ];

    /// Name as registered in MCP.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SendText => SendTextTool::NAME,
            Self::SendTemplate => SendTemplateTool::NAME,
            Self::SendImage => SendImageTool::NAME,
            Self::SendVideo => SendVideoTool::NAME,
            Self::SendDocument => SendDocumentTool::NAME,
            Self::SendLocation => SendLocationTool::NAME,
            Self::SendContact => SendContactTool::NAME,
            Self::MarkMessageAsRead => MarkMessageAsReadTool::NAME,
            Self::GetBusinessProfile => GetBusinessProfileTool::NAME,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::SendText => SendTextTool::DESCRIPTION,
            Self::SendTemplate => SendTemplateTool::DESCRIPTION,
            Self::SendImage => SendImageTool::DESCRIPTION,
            Self::SendVideo => SendVideoTool::DESCRIPTION,
            Self::SendDocument => SendDocumentTool::DESCRIPTION,
            Self::SendLocation => SendLocationTool::DESCRIPTION,
            Self::SendContact => SendContactTool::DESCRIPTION,
            Self::MarkMessageAsRead => MarkMessageAsReadTool::DESCRIPTION,
            Self::GetBusinessProfile => GetBusinessProfileTool::DESCRIPTION,
        }
    }

    /// Tool model (name, description, input schema) for advertisement.
    pub fn definition(self) -> Tool {
        match self {
            Self::SendText => SendTextTool::to_tool(),
            Self::SendTemplate => SendTemplateTool::to_tool(),
            Self::SendImage => SendImageTool::to_tool(),
            Self::SendVideo => SendVideoTool::to_tool(),
            Self::SendDocument => SendDocumentTool::to_tool(),
            Self::SendLocation => SendLocationTool::to_tool(),
            Self::SendContact => SendContactTool::to_tool(),
            Self::MarkMessageAsRead => MarkMessageAsReadTool::to_tool(),
            Self::GetBusinessProfile => GetBusinessProfileTool::to_tool(),
        }
    }
}

impl FromStr for ToolName {
    type Err = ToolError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == name)
            .ok_or_else(|| ToolError::not_found(name))
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - binds every `ToolName` to its validator and handler.
///
/// Holds nothing but the shared manager, so one instance can serve
/// concurrent calls.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    manager: Arc<WhatsAppManager>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(manager: Arc<WhatsAppManager>) -> Self {
        Self { manager }
    }

    /// The manager every tool call goes through.
    pub fn manager(&self) -> &Arc<WhatsAppManager> {
        &self.manager
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        ToolName::ALL.iter().map(|t| t.as_str()).collect()
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for all available tools.
    /// Both HTTP and STDIO/TCP transports use this to get tool metadata.
    pub fn get_all_tools() -> Vec<Tool> {
        ToolName::ALL.iter().map(|t| t.definition()).collect()
    }

    /// Validate `arguments` for the named tool and run it.
    ///
    /// Returns the Graph API response. Unknown names and invalid arguments
    /// fail before any request is made; Graph errors are passed through.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value, ToolError> {
        let tool: ToolName = name.parse()?;
        self.dispatch(tool, arguments).await
    }

    /// Run a known tool.
    pub async fn dispatch(&self, tool: ToolName, arguments: Value) -> Result<Value, ToolError> {
        let manager = self.manager.as_ref();
        match tool {
            ToolName::SendText => dispatch::<SendTextTool>(manager, arguments).await,
            ToolName::SendTemplate => dispatch::<SendTemplateTool>(manager, arguments).await,
            ToolName::SendImage => dispatch::<SendImageTool>(manager, arguments).await,
            ToolName::SendVideo => dispatch::<SendVideoTool>(manager, arguments).await,
            ToolName::SendDocument => dispatch::<SendDocumentTool>(manager, arguments).await,
            ToolName::SendLocation => dispatch::<SendLocationTool>(manager, arguments).await,
            ToolName::SendContact => dispatch::<SendContactTool>(manager, arguments).await,
            ToolName::MarkMessageAsRead => {
                dispatch::<MarkMessageAsReadTool>(manager, arguments).await
            }
            ToolName::GetBusinessProfile => {
                dispatch::<GetBusinessProfileTool>(manager, arguments).await
            }
        }
    }

    /// `call_tool` with the outcome shaped as an MCP tool result.
    pub async fn call_tool_result(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<CallToolResult, McpError> {
        into_call_result(self.call_tool(name, arguments).await)
    }
}
