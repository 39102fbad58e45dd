//! Send a pre-approved template message.
//!
//! Templates are the only message type that may open a conversation outside
//! the 24 hour customer service window. The validated template object is
//! forwarded to the Graph API as-is.

use futures::FutureExt;
use futures::future::BoxFuture;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::graph::GraphResult;
use crate::domains::tools::definitions::common::{
    Validate, Violations, WhatsAppTool, deserialize_coerced_index, deserialize_integral,
};
use crate::domains::whatsapp::WhatsAppManager;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for `wa_send_template`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SendTemplateParams {
    #[schemars(description = "Recipient phone number")]
    pub to: String,

    #[schemars(description = "The template details")]
    pub template: Template,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Template {
    #[schemars(description = "Template name as registered in WhatsApp Manager")]
    pub name: String,

    pub language: TemplateLanguage,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Components whose variables are filled in, in order")]
    pub components: Option<Vec<TemplateComponent>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TemplateLanguage {
    #[schemars(description = "Language and locale code, e.g. en_US")]
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TemplateComponent {
    #[serde(rename = "type")]
    pub component_type: ComponentType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<ButtonSubType>,

    /// Position of the button this component targets.
    #[serde(
        default,
        deserialize_with = "deserialize_coerced_index",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<u32>", description = "Position in list for buttons")]
    pub index: Option<u32>,

    pub parameters: Vec<TemplateParameter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Header,
    Body,
    Button,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ButtonSubType {
    QuickReply,
    Url,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TemplateParameter {
    #[serde(rename = "type")]
    pub parameter_type: ParameterType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTimeValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<MediaObject>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<DocumentObject>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<MediaObject>,

    /// Developer-defined payload returned when a quick reply is tapped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    Text,
    Currency,
    DateTime,
    Image,
    Document,
    Video,
    Payload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CurrencyValue {
    pub fallback_value: String,

    #[schemars(description = "ISO 4217 currency code")]
    pub code: String,

    #[serde(deserialize_with = "deserialize_integral")]
    #[schemars(description = "Amount multiplied by 1000")]
    pub amount_1000: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DateTimeValue {
    pub fallback_value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MediaObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DocumentObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl Validate for SendTemplateParams {
    fn validate(&self, violations: &mut Violations) {
        violations.require_non_empty("to", &self.to);
        violations.require_non_empty("template.name", &self.template.name);
        violations.require_min_chars("template.language.code", &self.template.language.code, 2);

        for (c, component) in self.template.components.iter().flatten().enumerate() {
            for (p, parameter) in component.parameters.iter().enumerate() {
                let path = format!("template.components[{c}].parameters[{p}]");
                parameter.validate_at(&path, violations);
            }
        }
    }
}

impl TemplateParameter {
    fn validate_at(&self, path: &str, violations: &mut Violations) {
        let links = [
            ("image", self.image.as_ref().and_then(|m| m.link.as_deref())),
            ("document", self.document.as_ref().and_then(|d| d.link.as_deref())),
            ("video", self.video.as_ref().and_then(|m| m.link.as_deref())),
        ];
        for (kind, link) in links {
            violations.require_optional_url(format!("{path}.{kind}.link"), link);
        }
    }
}

// ============================================================================
// Tool Implementation
// ============================================================================

/// Template message tool.
#[derive(Debug, Clone)]
pub struct SendTemplateTool;

impl WhatsAppTool for SendTemplateTool {
    const NAME: &'static str = "wa_send_template";
    const DESCRIPTION: &'static str =
        "Send a template message (required for initiating conversations).";

    type Params = SendTemplateParams;

    fn execute(manager: &WhatsAppManager, params: Self::Params) -> BoxFuture<'_, GraphResult<Value>> {
        manager.send_template(params).boxed()
    }
}
