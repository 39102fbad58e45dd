//! Transports the MCP server can be reached over.
//!
//! - **STDIO** (feature `stdio`, default): what MCP hosts such as desktop
//!   assistants launch.
//! - **TCP** (feature `tcp`): line-delimited JSON-RPC, one session per
//!   connection.
//! - **HTTP** (feature `http`): JSON-RPC over POST, plus `/health`.
//!
//! Every transport hands requests to the same `McpServer`, so tool
//! behaviour does not depend on the channel.

pub(crate) mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "tcp")]
pub use config::TcpConfig;

#[cfg(feature = "http")]
pub use config::HttpConfig;
