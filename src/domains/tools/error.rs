//! Tool-specific error types.

use thiserror::Error;

use crate::core::graph::GraphApiError;

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// Arguments failed validation; the Graph API was not contacted.
    #[error("Invalid arguments for {tool}: {}", .violations.join("; "))]
    InvalidArguments {
        tool: String,
        violations: Vec<String>,
    },

    /// The Graph API call failed. Passed through unchanged.
    #[error(transparent)]
    Graph(#[from] GraphApiError),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(tool: impl Into<String>, violations: Vec<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            violations,
        }
    }

    /// Violated constraints, if this is a validation failure.
    pub fn violations(&self) -> &[String] {
        match self {
            Self::InvalidArguments { violations, .. } => violations,
            _ => &[],
        }
    }
}
