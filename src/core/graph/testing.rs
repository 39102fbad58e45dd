//! In-memory `GraphTransport` for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{GraphApiError, GraphRequest, GraphResult, GraphTransport};

/// Records every request and answers with a canned response.
pub(crate) struct RecordingTransport {
    requests: Mutex<Vec<GraphRequest>>,
    fail_with_status: Option<u16>,
}

impl RecordingTransport {
    pub(crate) fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail_with_status: None,
        }
    }

    /// Answer every request with a Graph error envelope and this status.
    pub(crate) fn failing(status: u16) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail_with_status: Some(status),
        }
    }

    pub(crate) fn requests(&self) -> Vec<GraphRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn last_request(&self) -> GraphRequest {
        self.requests()
            .pop()
            .expect("no request was sent to the transport")
    }
}

#[async_trait]
impl GraphTransport for RecordingTransport {
    async fn request(&self, request: GraphRequest) -> GraphResult<Value> {
        self.requests.lock().unwrap().push(request);

        match self.fail_with_status {
            Some(status) => Err(GraphApiError::from_response(
                status,
                r#"{"error":{"message":"Recipient phone number not in allowed list","type":"OAuthException","code":131030}}"#,
            )),
            None => Ok(json!({
                "messaging_product": "whatsapp",
                "contacts": [{"input": "15551234567", "wa_id": "15551234567"}],
                "messages": [{"id": "wamid.TEST"}]
            })),
        }
    }
}
