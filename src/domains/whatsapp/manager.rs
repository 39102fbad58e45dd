//! Request construction and execution for every WhatsApp operation.

use std::sync::Arc;

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::core::config::WhatsAppConfig;
use crate::core::graph::{GraphApiClient, GraphRequest, GraphResult, GraphTransport};
use crate::core::{Error, Result};
use crate::domains::tools::definitions::{
    GetBusinessProfileParams, MarkMessageAsReadParams, SendContactParams, SendDocumentParams,
    SendImageParams, SendLocationParams, SendTemplateParams, SendTextParams, SendVideoParams,
};

/// Value of `messaging_product` on every Cloud API call.
pub const MESSAGING_PRODUCT: &str = "whatsapp";

/// Builds and sends WhatsApp Cloud API requests for one phone number.
///
/// Holds only immutable configuration, so one instance can serve concurrent
/// calls. Each operation performs exactly one Graph request.
#[derive(Clone)]
pub struct WhatsAppManager {
    client: Arc<dyn GraphTransport>,
    phone_number_id: String,
    business_account_id: Option<String>,
}

impl std::fmt::Debug for WhatsAppManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsAppManager")
            .field("phone_number_id", &self.phone_number_id)
            .field("business_account_id", &self.business_account_id)
            .finish_non_exhaustive()
    }
}

impl WhatsAppManager {
    /// Create a manager backed by a `GraphApiClient`.
    ///
    /// # Errors
    ///
    /// Fails immediately with `Error::Config` if the access token or the
    /// phone-number id is missing, or if the Graph URL is invalid.
    pub fn new(config: &WhatsAppConfig) -> Result<Self> {
        let access_token = required(config.access_token.as_deref(), "WHATSAPP_ACCESS_TOKEN")?;
        let phone_number_id = required(config.phone_number_id.as_deref(), "WHATSAPP_PHONE_NUMBER_ID")?;

        let client = GraphApiClient::new(config, access_token)?;
        let manager = Self::with_transport(phone_number_id, Arc::new(client))?;

        Ok(match &config.business_account_id {
            Some(id) => manager.with_business_account_id(id.clone()),
            None => manager,
        })
    }

    /// Create a manager that sends through an arbitrary transport.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `phone_number_id` is empty.
    pub fn with_transport(
        phone_number_id: impl Into<String>,
        client: Arc<dyn GraphTransport>,
    ) -> Result<Self> {
        let phone_number_id = phone_number_id.into();
        if phone_number_id.trim().is_empty() {
            return Err(Error::config("WHATSAPP_PHONE_NUMBER_ID is not set"));
        }

        Ok(Self {
            client,
            phone_number_id,
            business_account_id: None,
        })
    }

    /// Attach the WhatsApp Business Account id.
    pub fn with_business_account_id(mut self, id: impl Into<String>) -> Self {
        self.business_account_id = Some(id.into());
        self
    }

    pub fn phone_number_id(&self) -> &str {
        &self.phone_number_id
    }

    /// Currently informational: no operation needs it, the business profile
    /// is read through the phone-number node.
    pub fn business_account_id(&self) -> Option<&str> {
        self.business_account_id.as_deref()
    }

    fn messages_endpoint(&self) -> String {
        format!("{}/messages", self.phone_number_id)
    }

    fn business_profile_endpoint(&self) -> String {
        format!("{}/whatsapp_business_profile", self.phone_number_id)
    }

    /// Wrap a type-specific payload in the common message envelope.
    fn message_request(&self, to: &str, message_type: &str, payload: Value) -> GraphRequest {
        let mut body = Map::new();
        body.insert("messaging_product".into(), MESSAGING_PRODUCT.into());
        body.insert("recipient_type".into(), "individual".into());
        body.insert("to".into(), to.into());
        body.insert("type".into(), message_type.into());
        body.insert(message_type.into(), payload);
        GraphRequest::post(self.messages_endpoint(), Value::Object(body))
    }

    async fn send(&self, request: GraphRequest) -> GraphResult<Value> {
        debug!(endpoint = %request.endpoint, "Dispatching WhatsApp request");
        self.client.request(request).await
    }

    // ========================================================================
    // Request construction
    // ========================================================================

    pub fn text_request(&self, args: &SendTextParams) -> GraphRequest {
        self.message_request(
            &args.to,
            "text",
            json!({
                "body": args.body,
                "preview_url": args.preview_url,
            }),
        )
    }

    pub fn template_request(&self, args: &SendTemplateParams) -> GraphRequest {
        self.message_request(&args.to, "template", json!(args.template))
    }

    pub fn image_request(&self, args: &SendImageParams) -> GraphRequest {
        let image = media_object(
            args.image_id.as_deref(),
            args.image_url.as_deref(),
            args.caption.as_deref(),
            None,
        );
        self.message_request(&args.to, "image", image)
    }

    pub fn video_request(&self, args: &SendVideoParams) -> GraphRequest {
        let video = media_object(
            args.video_id.as_deref(),
            args.video_url.as_deref(),
            args.caption.as_deref(),
            None,
        );
        self.message_request(&args.to, "video", video)
    }

    pub fn document_request(&self, args: &SendDocumentParams) -> GraphRequest {
        let document = media_object(
            args.document_id.as_deref(),
            args.document_url.as_deref(),
            args.caption.as_deref(),
            args.filename.as_deref(),
        );
        self.message_request(&args.to, "document", document)
    }

    pub fn location_request(&self, args: &SendLocationParams) -> GraphRequest {
        let mut location = Map::new();
        location.insert("latitude".into(), json!(args.latitude));
        location.insert("longitude".into(), json!(args.longitude));
        if let Some(name) = &args.name {
            location.insert("name".into(), name.as_str().into());
        }
        if let Some(address) = &args.address {
            location.insert("address".into(), address.as_str().into());
        }
        self.message_request(&args.to, "location", Value::Object(location))
    }

    pub fn contact_request(&self, args: &SendContactParams) -> GraphRequest {
        self.message_request(&args.to, "contacts", json!(args.contacts))
    }

    /// Read receipts carry no recipient or type envelope.
    pub fn mark_as_read_request(&self, args: &MarkMessageAsReadParams) -> GraphRequest {
        GraphRequest::post(
            self.messages_endpoint(),
            json!({
                "messaging_product": MESSAGING_PRODUCT,
                "status": "read",
                "message_id": args.message_id,
            }),
        )
    }

    pub fn business_profile_request(&self, args: &GetBusinessProfileParams) -> GraphRequest {
        let request = GraphRequest::get(self.business_profile_endpoint());
        if args.fields.is_empty() {
            request
        } else {
            request.with_param("fields", args.fields.join(","))
        }
    }

    // ========================================================================
    // Operations
    // ========================================================================

    pub async fn send_text(&self, args: SendTextParams) -> GraphResult<Value> {
        self.send(self.text_request(&args)).await
    }

    pub async fn send_template(&self, args: SendTemplateParams) -> GraphResult<Value> {
        self.send(self.template_request(&args)).await
    }

    pub async fn send_image(&self, args: SendImageParams) -> GraphResult<Value> {
        self.send(self.image_request(&args)).await
    }

    pub async fn send_video(&self, args: SendVideoParams) -> GraphResult<Value> {
        self.send(self.video_request(&args)).await
    }

    pub async fn send_document(&self, args: SendDocumentParams) -> GraphResult<Value> {
        self.send(self.document_request(&args)).await
    }

    pub async fn send_location(&self, args: SendLocationParams) -> GraphResult<Value> {
        self.send(self.location_request(&args)).await
    }

    pub async fn send_contact(&self, args: SendContactParams) -> GraphResult<Value> {
        self.send(self.contact_request(&args)).await
    }

    pub async fn mark_message_as_read(&self, args: MarkMessageAsReadParams) -> GraphResult<Value> {
        self.send(self.mark_as_read_request(&args)).await
    }

    pub async fn get_business_profile(&self, args: GetBusinessProfileParams) -> GraphResult<Value> {
        self.send(self.business_profile_request(&args)).await
    }
}

fn required<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::config(format!("{name} is not set")))
}

/// Media payload with only the supplied keys present.
fn media_object(
    id: Option<&str>,
    link: Option<&str>,
    caption: Option<&str>,
    filename: Option<&str>,
) -> Value {
    let mut media = Map::new();
    for (key, value) in [("id", id), ("link", link), ("caption", caption), ("filename", filename)] {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            media.insert(key.into(), value.into());
        }
    }
    Value::Object(media)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::testing::RecordingTransport;
    use crate::core::graph::{GraphApiError, HttpMethod};
    use crate::domains::tools::definitions::{
        GetBusinessProfileTool, SendContactTool, SendImageTool, SendLocationTool, SendTemplateTool,
        WhatsAppTool,
    };

    const PHONE_ID: &str = "106540352242922";

    fn manager() -> (WhatsAppManager, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::new());
        let manager = WhatsAppManager::with_transport(PHONE_ID, transport.clone()).unwrap();
        (manager, transport)
    }

    #[test]
    fn test_new_without_access_token_fails_fast() {
        let config = WhatsAppConfig {
            phone_number_id: Some(PHONE_ID.to_string()),
            ..WhatsAppConfig::default()
        };
        let err = WhatsAppManager::new(&config).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("WHATSAPP_ACCESS_TOKEN"));
    }

    #[test]
    fn test_new_without_phone_number_id_fails_fast() {
        let config = WhatsAppConfig {
            access_token: Some("token".to_string()),
            ..WhatsAppConfig::default()
        };
        let err = WhatsAppManager::new(&config).unwrap_err();
        assert!(err.to_string().contains("WHATSAPP_PHONE_NUMBER_ID"));
    }

    #[test]
    fn test_new_with_credentials() {
        let config = WhatsAppConfig {
            access_token: Some("token".to_string()),
            phone_number_id: Some(PHONE_ID.to_string()),
            business_account_id: Some("waba-1".to_string()),
            ..WhatsAppConfig::default()
        };
        let manager = WhatsAppManager::new(&config).unwrap();
        assert_eq!(manager.phone_number_id(), PHONE_ID);
        assert_eq!(manager.business_account_id(), Some("waba-1"));
    }

    #[test]
    fn test_with_transport_rejects_blank_phone_id() {
        let err = WhatsAppManager::with_transport(" ", Arc::new(RecordingTransport::new())).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_text_request_shape() {
        let (manager, _) = manager();
        let request = manager.text_request(&SendTextParams {
            to: "15551234567".into(),
            body: "hello".into(),
            preview_url: false,
        });
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.endpoint, format!("{PHONE_ID}/messages"));
        assert_eq!(
            request.body,
            Some(json!({
                "messaging_product": "whatsapp",
                "recipient_type": "individual",
                "to": "15551234567",
                "type": "text",
                "text": {"body": "hello", "preview_url": false}
            }))
        );
    }

    #[test]
    fn test_image_with_only_id_omits_link_and_caption() {
        let (manager, _) = manager();
        let args = SendImageTool::parse(json!({"to": "15551234567", "image_id": "123"})).unwrap();
        let body = manager.image_request(&args).body.unwrap();
        assert_eq!(body["type"], "image");
        assert_eq!(body["image"], json!({"id": "123"}));
    }

    #[test]
    fn test_document_includes_supplied_fields_only() {
        let (manager, _) = manager();
        let request = manager.document_request(&SendDocumentParams {
            to: "15551234567".into(),
            document_url: Some("https://example.com/invoice.pdf".into()),
            document_id: None,
            caption: Some(String::new()),
            filename: Some("invoice.pdf".into()),
        });
        assert_eq!(
            request.body.unwrap()["document"],
            json!({"link": "https://example.com/invoice.pdf", "filename": "invoice.pdf"})
        );
    }

    #[test]
    fn test_video_with_url_and_caption() {
        let (manager, _) = manager();
        let request = manager.video_request(&SendVideoParams {
            to: "1".into(),
            video_url: Some("https://example.com/v.mp4".into()),
            video_id: Some("987".into()),
            caption: Some("clip".into()),
        });
        assert_eq!(
            request.body.unwrap()["video"],
            json!({"id": "987", "link": "https://example.com/v.mp4", "caption": "clip"})
        );
    }

    #[test]
    fn test_template_forwarded_verbatim() {
        let (manager, _) = manager();
        let template = json!({
            "name": "hello_world",
            "language": {"code": "en_US"},
            "components": [{"type": "body", "parameters": [{"type": "text", "text": "Jane"}]}]
        });
        let args = SendTemplateTool::parse(json!({"to": "1", "template": template.clone()})).unwrap();
        let body = manager.template_request(&args).body.unwrap();
        assert_eq!(body["type"], "template");
        assert_eq!(body["template"], template);
    }

    #[test]
    fn test_contacts_forwarded_verbatim() {
        let (manager, _) = manager();
        let contacts = json!([{"name": {"formatted_name": "Jane Doe"}, "phones": [{"phone": "+15551234567"}]}]);
        let args = SendContactTool::parse(json!({"to": "1", "contacts": contacts.clone()})).unwrap();
        let body = manager.contact_request(&args).body.unwrap();
        assert_eq!(body["type"], "contacts");
        assert_eq!(body["contacts"], contacts);
    }

    #[test]
    fn test_mark_as_read_has_no_recipient() {
        let (manager, _) = manager();
        let request = manager.mark_as_read_request(&MarkMessageAsReadParams {
            message_id: "wamid.ABC".into(),
        });
        assert_eq!(request.endpoint, format!("{PHONE_ID}/messages"));
        assert_eq!(
            request.body,
            Some(json!({"messaging_product": "whatsapp", "status": "read", "message_id": "wamid.ABC"}))
        );
    }

    #[test]
    fn test_business_profile_default_fields_query() {
        let (manager, _) = manager();
        let args = GetBusinessProfileTool::parse(json!({})).unwrap();
        let request = manager.business_profile_request(&args);
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.endpoint, format!("{PHONE_ID}/whatsapp_business_profile"));
        assert!(request.body.is_none());
        assert_eq!(
            request.params.get("fields").map(String::as_str),
            Some("about,address,description,email,profile_picture_url,websites,vertical")
        );
    }

    #[test]
    fn test_business_profile_without_fields_omits_param() {
        let (manager, _) = manager();
        let request = manager.business_profile_request(&GetBusinessProfileParams { fields: vec![] });
        assert!(request.params.is_empty());
    }

    #[tokio::test]
    async fn test_send_location_end_to_end() {
        let (manager, transport) = manager();
        let args = SendLocationTool::parse(json!({
            "to": "15551234567",
            "latitude": 37.0,
            "longitude": -122.0
        }))
        .unwrap();

        let response = manager.send_location(args).await.unwrap();
        assert_eq!(response["messages"][0]["id"], "wamid.TEST");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].endpoint, format!("{PHONE_ID}/messages"));
        assert_eq!(
            requests[0].body,
            Some(json!({
                "messaging_product": "whatsapp",
                "recipient_type": "individual",
                "to": "15551234567",
                "type": "location",
                "location": {"latitude": 37.0, "longitude": -122.0}
            }))
        );
    }

    #[tokio::test]
    async fn test_transport_errors_pass_through_unchanged() {
        let transport = Arc::new(RecordingTransport::failing(400));
        let manager = WhatsAppManager::with_transport(PHONE_ID, transport.clone()).unwrap();

        let err = manager
            .send_text(SendTextParams {
                to: "1".into(),
                body: "hi".into(),
                preview_url: false,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, GraphApiError::Api { status: 400, code: Some(131030), .. }));
        assert_eq!(transport.requests().len(), 1);
    }
}
