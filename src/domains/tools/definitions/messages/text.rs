//! Send a plain text message.

use futures::FutureExt;
use futures::future::BoxFuture;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::graph::GraphResult;
use crate::domains::tools::definitions::common::{Validate, Violations, WhatsAppTool};
use crate::domains::whatsapp::WhatsAppManager;

/// Parameters for `wa_send_text`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SendTextParams {
    /// Recipient phone number.
    #[schemars(description = "Recipient phone number in international format without +")]
    pub to: String,

    /// Message text.
    #[schemars(description = "The text message content")]
    pub body: String,

    /// Render a link preview for the first URL in `body`.
    #[serde(default)]
    #[schemars(description = "Whether to show a preview for URLs in the message")]
    pub preview_url: bool,
}

impl Validate for SendTextParams {
    fn validate(&self, violations: &mut Violations) {
        violations.require_non_empty("to", &self.to);
        violations.require_non_empty("body", &self.body);
    }
}

/// Text message tool.
#[derive(Debug, Clone)]
pub struct SendTextTool;

impl WhatsAppTool for SendTextTool {
    const NAME: &'static str = "wa_send_text";
    const DESCRIPTION: &'static str = "Send a text message to a WhatsApp user.";

    type Params = SendTextParams;

    fn execute(manager: &WhatsAppManager, params: Self::Params) -> BoxFuture<'_, GraphResult<Value>> {
        manager.send_text(params).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preview_url_defaults_to_false() {
        let params = SendTextTool::parse(json!({"to": "15551234567", "body": "hi"})).unwrap();
        assert!(!params.preview_url);
    }

    #[test]
    fn test_preview_url_is_kept_when_given() {
        let params = SendTextTool::parse(json!({
            "to": "15551234567",
            "body": "see https://example.com",
            "preview_url": true
        }))
        .unwrap();
        assert!(params.preview_url);
    }

    #[test]
    fn test_rejects_empty_body_and_recipient() {
        let err = SendTextTool::parse(json!({"to": "", "body": ""})).unwrap_err();
        assert_eq!(
            err.violations(),
            ["to: must not be empty", "body: must not be empty"]
        );
        assert!(err.to_string().contains("wa_send_text"));
    }

    #[test]
    fn test_rejects_missing_body() {
        let err = SendTextTool::parse(json!({"to": "15551234567"})).unwrap_err();
        assert_eq!(err.violations(), ["missing field `body`"]);
    }

    #[test]
    fn test_rejects_non_boolean_preview() {
        let err = SendTextTool::parse(json!({"to": "1", "body": "x", "preview_url": "yes"})).unwrap_err();
        assert!(err.violations()[0].starts_with("preview_url: invalid type"));
    }
}
