//! Transport error types.

use thiserror::Error;

pub type TransportResult<T> = Result<T, TransportError>;

/// Failures that stop a transport from serving.
///
/// Per-connection failures on TCP are logged and do not surface here.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The MCP handshake with the client failed.
    #[error("Failed to start MCP session: {0}")]
    Handshake(String),

    /// The session ended with an error after the handshake.
    #[error("MCP session error: {0}")]
    Session(String),

    #[cfg(feature = "http")]
    #[error("HTTP server error: {0}")]
    Http(#[from] std::io::Error),
}

impl TransportError {
    pub fn bind(address: impl Into<String>, source: std::io::Error) -> Self {
        Self::Bind {
            address: address.into(),
            source,
        }
    }

    pub fn handshake(msg: impl ToString) -> Self {
        Self::Handshake(msg.to_string())
    }

    pub fn session(msg: impl ToString) -> Self {
        Self::Session(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_error_names_address() {
        let err = TransportError::bind(
            "127.0.0.1:80",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "Failed to bind to 127.0.0.1:80: denied");
        assert!(std::error::Error::source(&err).is_some());
    }
}
