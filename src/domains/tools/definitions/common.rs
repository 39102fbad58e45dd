//! Common utilities shared across WhatsApp tools.
//!
//! This module provides the `WhatsAppTool` contract every definition
//! implements, argument parsing and constraint checking, and the helpers
//! that turn tool outcomes into MCP results.

use std::fmt::Display;
use std::sync::LazyLock;

use futures::future::BoxFuture;
use regex::Regex;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::cached_schema_for_type,
    model::{CallToolResult, Content, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::{Map, Value, json};
use tracing::{info, warn};
use url::Url;

use crate::core::graph::GraphResult;
use crate::domains::tools::ToolError;
use crate::domains::whatsapp::WhatsAppManager;

/// A WhatsApp operation exposed as an MCP tool.
///
/// `Params` is the validated argument shape: serde enforces types, enums and
/// defaults, `Validate` enforces everything serde cannot express.
pub trait WhatsAppTool {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// Validated arguments for this tool.
    type Params: DeserializeOwned + JsonSchema + Validate + Send + 'static;

    /// Run the operation through the manager.
    fn execute(manager: &WhatsAppManager, params: Self::Params) -> BoxFuture<'_, GraphResult<Value>>;

    /// Parse and validate raw arguments.
    fn parse(arguments: Value) -> Result<Self::Params, ToolError> {
        // A call without arguments is an empty object, so defaults still apply.
        let arguments = match arguments {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        let params: Self::Params = serde_path_to_error::deserialize(arguments)
            .map_err(|e| ToolError::invalid_arguments(Self::NAME, vec![describe_shape_error(&e)]))?;

        let mut violations = Violations::new();
        params.validate(&mut violations);
        if violations.is_empty() {
            Ok(params)
        } else {
            Err(ToolError::invalid_arguments(Self::NAME, violations.into_vec()))
        }
    }

    /// Create a Tool model for this tool (metadata).
    fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<Self::Params>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

/// Validate raw arguments for `T` and run it.
///
/// The manager is never reached when validation fails.
pub async fn dispatch<T: WhatsAppTool>(
    manager: &WhatsAppManager,
    arguments: Value,
) -> Result<Value, ToolError> {
    let params = T::parse(arguments)?;
    info!(tool = T::NAME, "Executing tool");
    Ok(T::execute(manager, params).await?)
}

/// Render a deserialization failure in the same `field: message` form as
/// [`Violations`]. Failures at the top level carry no path.
fn describe_shape_error(err: &serde_path_to_error::Error<serde_json::Error>) -> String {
    let path = err.path().to_string();
    if path == "." {
        err.inner().to_string()
    } else {
        format!("{path}: {}", err.inner())
    }
}

// ============================================================================
// Constraint checking
// ============================================================================

/// Field-level constraints that serde cannot express.
pub trait Validate {
    /// Record every violated constraint.
    fn validate(&self, violations: &mut Violations);
}

/// Collected constraint violations, each prefixed with its field path.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Violations {
    items: Vec<String>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Display, message: impl Display) {
        self.items.push(format!("{field}: {message}"));
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }

    pub fn require_non_empty(&mut self, field: impl Display, value: &str) {
        if value.is_empty() {
            self.add(field, "must not be empty");
        }
    }

    pub fn require_min_chars(&mut self, field: impl Display, value: &str, min: usize) {
        if value.chars().count() < min {
            self.add(field, format!("must be at least {min} characters"));
        }
    }

    pub fn require_url(&mut self, field: impl Display, value: &str) {
        if !is_valid_url(value) {
            self.add(field, "must be a valid URL");
        }
    }

    pub fn require_optional_url(&mut self, field: impl Display, value: Option<&str>) {
        if let Some(value) = value {
            self.require_url(field, value);
        }
    }

    pub fn require_email(&mut self, field: impl Display, value: &str) {
        if !is_valid_email(value) {
            self.add(field, "must be a valid email address");
        }
    }

    pub fn require_range(&mut self, field: impl Display, value: f64, min: f64, max: f64) {
        if !(min..=max).contains(&value) {
            self.add(field, format!("must be between {min} and {max}"));
        }
    }
}

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-']+@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$")
        .expect("email regex is valid")
});

/// Check that a string is an absolute URL. Any scheme is accepted, so
/// `mailto:` and `tel:` pass; relative references do not.
pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}

/// Check that a string looks like an email address.
pub fn is_valid_email(value: &str) -> bool {
    !value.contains("..") && EMAIL_RE.is_match(value)
}

/// An optional string counts as supplied only when it is non-empty.
pub fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

/// Deserialize an optional non-negative integer from a number or a numeric string.
pub fn deserialize_coerced_index<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Option::<Value>::deserialize(deserializer)?;
    let number = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(other) => return Err(D::Error::custom(format!("invalid index: {other}"))),
    };

    match number {
        Some(n) if n >= 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX) => Ok(Some(n as u32)),
        _ => Err(D::Error::custom("index must be a non-negative integer")),
    }
}

/// Deserialize an integer that may arrive as an integral float, e.g. `12500.0`.
pub fn deserialize_integral<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(n) = number.as_i64() {
        return Ok(n);
    }
    match number.as_f64() {
        Some(n) if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 => Ok(n as i64),
        _ => Err(D::Error::custom(format!("expected an integer, got {number}"))),
    }
}

// ============================================================================
// MCP results
// ============================================================================

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Create a success result carrying the Graph API response as JSON text.
pub fn success_result(value: &Value) -> CallToolResult {
    let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    CallToolResult::success(vec![Content::text(text)])
}

/// Map a tool outcome onto the MCP surface.
///
/// Caller mistakes (unknown tool, bad arguments) become protocol errors;
/// Graph API failures become tool results flagged with `isError`.
pub fn into_call_result(result: Result<Value, ToolError>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(value) => Ok(success_result(&value)),
        Err(ToolError::Graph(e)) => Ok(error_result(&e.to_string())),
        Err(e @ ToolError::NotFound(_)) => {
            warn!("{}", e);
            Err(McpError::invalid_params(e.to_string(), None))
        }
        Err(ToolError::InvalidArguments { tool, violations }) => {
            let message = format!("Invalid arguments for {}: {}", tool, violations.join("; "));
            warn!("{}", message);
            Err(McpError::invalid_params(
                message,
                Some(json!({ "tool": tool, "violations": violations })),
            ))
        }
    }
}
