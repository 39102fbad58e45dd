//! Tools domain module.
//!
//! This module exposes the WhatsApp operations as MCP tools.
//!
//! ## Architecture
//!
//! - `definitions/` - Argument schemas and tool bindings (one file per family)
//! - `registry.rs` - `ToolName`, validation and dispatch
//! - `router.rs` - rmcp ToolRouter for STDIO/TCP transport
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Define params and a `WhatsAppTool` impl in `definitions/`
//! 2. Add the request builder and operation to `WhatsAppManager`
//! 3. Add a `ToolName` variant and its match arms in `registry.rs`
//!
//! The router and server pick the tool up from `ToolName::ALL`.

pub mod definitions;
mod error;
mod registry;
pub mod router;

pub use error::ToolError;
pub use registry::{ToolName, ToolRegistry};
pub use router::build_tool_router;
