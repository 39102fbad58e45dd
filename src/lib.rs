//! WhatsApp MCP Server Library
//!
//! Exposes the WhatsApp Business Cloud API to MCP clients as a fixed set of
//! tools: text, template, image, video, document, location and contact
//! messages, read receipts, and the business profile lookup.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the Graph API client, the MCP
//!   server handler and its transports
//! - **domains**: business logic
//!   - **tools**: tool definitions, argument validation, and the registry
//!     that binds tool names to handlers
//!   - **whatsapp**: the manager that turns validated arguments into Graph
//!     API requests
//!
//! # Example
//!
//! ```rust,no_run
//! use whatsapp_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

pub use core::{Config, Error, McpServer, Result};
