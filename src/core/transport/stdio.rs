//! STDIO transport, the mode MCP hosts launch the server in.
//!
//! stdout carries protocol frames only; all logging goes to stderr.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

pub struct StdioTransport;

impl StdioTransport {
    pub async fn run(server: McpServer) -> TransportResult<()> {
        let name = server.name().to_string();

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(TransportError::handshake)?;

        info!(server = %name, "Ready - communicating via stdin/stdout");

        let reason = service.waiting().await.map_err(TransportError::session)?;

        info!(server = %name, ?reason, "STDIO session closed");
        Ok(())
    }
}
