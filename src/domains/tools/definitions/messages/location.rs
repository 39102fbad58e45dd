//! Send a location pin.

use futures::FutureExt;
use futures::future::BoxFuture;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::graph::GraphResult;
use crate::domains::tools::definitions::common::{Validate, Violations, WhatsAppTool};
use crate::domains::whatsapp::WhatsAppManager;

/// Parameters for `wa_send_location`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SendLocationParams {
    #[schemars(description = "Recipient phone number")]
    pub to: String,

    #[schemars(description = "Latitude in decimal degrees")]
    pub latitude: f64,

    #[schemars(description = "Longitude in decimal degrees")]
    pub longitude: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Name of the location")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Address of the location")]
    pub address: Option<String>,
}

impl Validate for SendLocationParams {
    fn validate(&self, violations: &mut Violations) {
        violations.require_non_empty("to", &self.to);
        violations.require_range("latitude", self.latitude, -90.0, 90.0);
        violations.require_range("longitude", self.longitude, -180.0, 180.0);
    }
}

/// Location message tool.
#[derive(Debug, Clone)]
pub struct SendLocationTool;

impl WhatsAppTool for SendLocationTool {
    const NAME: &'static str = "wa_send_location";
    const DESCRIPTION: &'static str = "Send a location to a WhatsApp user.";

    type Params = SendLocationParams;

    fn execute(manager: &WhatsAppManager, params: Self::Params) -> BoxFuture<'_, GraphResult<Value>> {
        manager.send_location(params).boxed()
    }
}
