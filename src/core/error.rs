//! Error types and handling for the MCP server.
//!
//! Tool calls report failures through `ToolError`, which never escapes the
//! MCP surface. This type covers what can stop the server itself: bad
//! configuration, a Graph client that cannot be built, or a transport that
//! fails to serve.

use thiserror::Error;

use super::graph::GraphApiError;
use super::transport::TransportError;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for server startup and lifetime.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or unusable configuration, such as absent credentials.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The Graph API client could not be constructed.
    #[error("Graph API error: {0}")]
    Graph(#[from] GraphApiError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error was raised while validating configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
