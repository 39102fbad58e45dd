//! Send image, video and document messages.
//!
//! Media is referenced either by a public URL or by the id of a file
//! previously uploaded to WhatsApp. At least one of the two is required.

use futures::FutureExt;
use futures::future::BoxFuture;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::graph::GraphResult;
use crate::domains::tools::definitions::common::{
    Validate, Violations, WhatsAppTool, is_present,
};
use crate::domains::whatsapp::WhatsAppManager;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for `wa_send_image`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SendImageParams {
    #[schemars(description = "Recipient phone number")]
    pub to: String,

    #[serde(default)]
    #[schemars(description = "Public URL of the image")]
    pub image_url: Option<String>,

    #[serde(default)]
    #[schemars(description = "Media ID of a previously uploaded image")]
    pub image_id: Option<String>,

    #[serde(default)]
    pub caption: Option<String>,
}

/// Parameters for `wa_send_video`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SendVideoParams {
    #[schemars(description = "Recipient phone number")]
    pub to: String,

    #[serde(default)]
    #[schemars(description = "Public URL of the video")]
    pub video_url: Option<String>,

    #[serde(default)]
    #[schemars(description = "Media ID of a previously uploaded video")]
    pub video_id: Option<String>,

    #[serde(default)]
    pub caption: Option<String>,
}

/// Parameters for `wa_send_document`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SendDocumentParams {
    #[schemars(description = "Recipient phone number")]
    pub to: String,

    #[serde(default)]
    #[schemars(description = "Public URL of the document")]
    pub document_url: Option<String>,

    #[serde(default)]
    #[schemars(description = "Media ID of a previously uploaded document")]
    pub document_id: Option<String>,

    #[serde(default)]
    pub caption: Option<String>,

    #[serde(default)]
    #[schemars(description = "File name shown to the recipient")]
    pub filename: Option<String>,
}

/// Shared checks for a media message.
///
/// The URL-or-id rule only runs once the per-field checks have passed, so a
/// malformed URL is reported as such rather than as a missing source.
fn validate_media(
    violations: &mut Violations,
    to: &str,
    url_field: &str,
    url: Option<&str>,
    id_field: &str,
    id: Option<&str>,
) {
    let before = violations.len();
    violations.require_non_empty("to", to);
    violations.require_optional_url(url_field, url);

    if violations.len() == before && !is_present(url) && !is_present(id) {
        violations.add(
            format!("{url_field}|{id_field}"),
            format!("Either {url_field} or {id_field} must be provided"),
        );
    }
}

impl Validate for SendImageParams {
    fn validate(&self, violations: &mut Violations) {
        validate_media(
            violations,
            &self.to,
            "image_url",
            self.image_url.as_deref(),
            "image_id",
            self.image_id.as_deref(),
        );
    }
}

impl Validate for SendVideoParams {
    fn validate(&self, violations: &mut Violations) {
        validate_media(
            violations,
            &self.to,
            "video_url",
            self.video_url.as_deref(),
            "video_id",
            self.video_id.as_deref(),
        );
    }
}

impl Validate for SendDocumentParams {
    fn validate(&self, violations: &mut Violations) {
        validate_media(
            violations,
            &self.to,
            "document_url",
            self.document_url.as_deref(),
            "document_id",
            self.document_id.as_deref(),
        );
    }
}

// ============================================================================
// Tool Implementations
// ============================================================================

/// Image message tool.
#[derive(Debug, Clone)]
pub struct SendImageTool;

impl WhatsAppTool for SendImageTool {
    const NAME: &'static str = "wa_send_image";
    const DESCRIPTION: &'static str = "Send an image to a WhatsApp user via URL or Media ID.";

    type Params = SendImageParams;

    fn execute(manager: &WhatsAppManager, params: Self::Params) -> BoxFuture<'_, GraphResult<Value>> {
        manager.send_image(params).boxed()
    }
}

/// Video message tool.
#[derive(Debug, Clone)]
pub struct SendVideoTool;

impl WhatsAppTool for SendVideoTool {
    const NAME: &'static str = "wa_send_video";
    const DESCRIPTION: &'static str = "Send a video to a WhatsApp user via URL or Media ID.";

    type Params = SendVideoParams;

    fn execute(manager: &WhatsAppManager, params: Self::Params) -> BoxFuture<'_, GraphResult<Value>> {
        manager.send_video(params).boxed()
    }
}

/// Document message tool.
#[derive(Debug, Clone)]
pub struct SendDocumentTool;

impl WhatsAppTool for SendDocumentTool {
    const NAME: &'static str = "wa_send_document";
    const DESCRIPTION: &'static str = "Send a document to a WhatsApp user via URL or Media ID.";

    type Params = SendDocumentParams;

    fn execute(manager: &WhatsAppManager, params: Self::Params) -> BoxFuture<'_, GraphResult<Value>> {
        manager.send_document(params).boxed()
    }
}
