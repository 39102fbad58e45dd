//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server,
//! including error handling, configuration, the Graph API client, server
//! lifecycle management, and transport layer abstractions.

pub mod config;
pub mod error;
pub mod graph;
pub mod server;
pub mod transport;

pub use config::{Config, WhatsAppConfig};
pub use error::{Error, Result};
pub use graph::{GraphApiClient, GraphApiError, GraphRequest, GraphTransport, HttpMethod};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
