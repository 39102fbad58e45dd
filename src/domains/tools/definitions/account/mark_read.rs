//! Mark an inbound message as read.

use futures::FutureExt;
use futures::future::BoxFuture;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::graph::GraphResult;
use crate::domains::tools::definitions::common::{Validate, Violations, WhatsAppTool};
use crate::domains::whatsapp::WhatsAppManager;

/// Parameters for `wa_mark_message_as_read`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MarkMessageAsReadParams {
    #[schemars(description = "ID of the received message (wamid)")]
    pub message_id: String,
}

impl Validate for MarkMessageAsReadParams {
    fn validate(&self, violations: &mut Violations) {
        violations.require_non_empty("message_id", &self.message_id);
    }
}

/// Read receipt tool.
#[derive(Debug, Clone)]
pub struct MarkMessageAsReadTool;

impl WhatsAppTool for MarkMessageAsReadTool {
    const NAME: &'static str = "wa_mark_message_as_read";
    const DESCRIPTION: &'static str = "Mark a message as read.";

    type Params = MarkMessageAsReadParams;

    fn execute(manager: &WhatsAppManager, params: Self::Params) -> BoxFuture<'_, GraphResult<Value>> {
        manager.mark_message_as_read(params).boxed()
    }
}
