//! Fetch the WhatsApp Business profile of the sending phone number.

use futures::FutureExt;
use futures::future::BoxFuture;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::graph::GraphResult;
use crate::domains::tools::definitions::common::{Validate, Violations, WhatsAppTool};
use crate::domains::whatsapp::WhatsAppManager;

/// Profile fields requested when the caller does not name any.
pub const DEFAULT_PROFILE_FIELDS: [&str; 7] = [
    "about",
    "address",
    "description",
    "email",
    "profile_picture_url",
    "websites",
    "vertical",
];

fn default_profile_fields() -> Vec<String> {
    DEFAULT_PROFILE_FIELDS.iter().map(|f| f.to_string()).collect()
}

/// Parameters for `wa_get_business_profile`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetBusinessProfileParams {
    #[serde(default = "default_profile_fields")]
    #[schemars(description = "Profile fields to return (default: about, address, description, email, profile_picture_url, websites, vertical)")]
    pub fields: Vec<String>,
}

impl Validate for GetBusinessProfileParams {
    fn validate(&self, _violations: &mut Violations) {}
}

/// Business profile tool.
#[derive(Debug, Clone)]
pub struct GetBusinessProfileTool;

impl WhatsAppTool for GetBusinessProfileTool {
    const NAME: &'static str = "wa_get_business_profile";
    const DESCRIPTION: &'static str = "Retrieve the business profile information.";

    type Params = GetBusinessProfileParams;

    fn execute(manager: &WhatsAppManager, params: Self::Params) -> BoxFuture<'_, GraphResult<Value>> {
        manager.get_business_profile(params).boxed()
    }
}
