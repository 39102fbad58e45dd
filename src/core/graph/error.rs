//! Graph API error types.

use serde::Deserialize;
use thiserror::Error;

/// Result type for Graph API calls.
pub type GraphResult<T> = Result<T, GraphApiError>;

/// Errors surfaced by the Graph API client.
#[derive(Debug, Error)]
pub enum GraphApiError {
    /// The remote API rejected the request.
    #[error("Graph API returned {status}: {message}{}", .code.map(|c| format!(" (code {c})")).unwrap_or_default())]
    Api {
        status: u16,
        code: Option<i64>,
        error_type: Option<String>,
        message: String,
        fbtrace_id: Option<String>,
    },

    /// The request never produced a response (DNS, TLS, timeout...).
    #[error("Graph API transport error: {0}")]
    Transport(String),

    /// A successful response carried a body that is not JSON.
    #[error("Invalid Graph API response: {0}")]
    InvalidResponse(String),

    /// The configured base URL or endpoint could not be parsed.
    #[error("Invalid Graph API URL: {0}")]
    InvalidUrl(String),
}

impl GraphApiError {
    /// Build an API error from a non-success status and raw response body.
    ///
    /// Graph wraps failures as `{"error": {"message", "type", "code", "fbtrace_id"}}`.
    /// Bodies that do not follow that envelope are kept verbatim as the message.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(ErrorEnvelope { error }) => Self::Api {
                status,
                code: error.code,
                error_type: error.error_type,
                message: error.message.unwrap_or_else(|| "Unknown error".to_string()),
                fbtrace_id: error.fbtrace_id,
            },
            Err(_) => Self::Api {
                status,
                code: None,
                error_type: None,
                message: if body.trim().is_empty() {
                    "Empty response body".to_string()
                } else {
                    body.trim().to_string()
                },
                fbtrace_id: None,
            },
        }
    }

    /// HTTP status of an API rejection, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GraphApiError {
    fn from(err: reqwest::Error) -> Self {
        // Drop the URL: it is not secret, but query strings can grow long.
        Self::Transport(err.without_url().to_string())
    }
}

impl From<url::ParseError> for GraphApiError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(rename = "type")]
    error_type: Option<String>,
    code: Option<i64>,
    fbtrace_id: Option<String>,
}
