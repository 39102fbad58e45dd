//! Send one or more contact cards.

use futures::FutureExt;
use futures::future::BoxFuture;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::graph::GraphResult;
use crate::domains::tools::definitions::common::{Validate, Violations, WhatsAppTool};
use crate::domains::whatsapp::WhatsAppManager;

/// Parameters for `wa_send_contact`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SendContactParams {
    #[schemars(description = "Recipient phone number")]
    pub to: String,

    #[schemars(description = "Contacts to share (at least one)")]
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Contact {
    pub name: ContactName,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phones: Option<Vec<ContactPhone>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<ContactEmail>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<ContactOrg>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<ContactUrl>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContactName {
    #[schemars(description = "Full name as it should be displayed")]
    pub formatted_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContactPhone {
    pub phone: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub phone_type: Option<PhoneType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "WhatsApp ID of the phone number")]
    pub wa_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PhoneType {
    Cell,
    Main,
    Iphone,
    Home,
    Work,
}

/// Label for contact emails and URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContactLabel {
    Home,
    Work,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContactEmail {
    pub email: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub email_type: Option<ContactLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContactOrg {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContactUrl {
    pub url: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub url_type: Option<ContactLabel>,
}

impl Validate for SendContactParams {
    fn validate(&self, violations: &mut Violations) {
        violations.require_non_empty("to", &self.to);

        if self.contacts.is_empty() {
            violations.add("contacts", "must contain at least 1 contact");
        }

        for (i, contact) in self.contacts.iter().enumerate() {
            let path = format!("contacts[{i}]");
            violations.require_non_empty(format!("{path}.name.formatted_name"), &contact.name.formatted_name);

            for (e, email) in contact.emails.iter().flatten().enumerate() {
                violations.require_email(format!("{path}.emails[{e}].email"), &email.email);
            }
            for (u, url) in contact.urls.iter().flatten().enumerate() {
                violations.require_url(format!("{path}.urls[{u}].url"), &url.url);
            }
        }
    }
}

/// Contact card tool.
#[derive(Debug, Clone)]
pub struct SendContactTool;

impl WhatsAppTool for SendContactTool {
    const NAME: &'static str = "wa_send_contact";
    const DESCRIPTION: &'static str = "Send one or more contacts to a WhatsApp user.";

    type Params = SendContactParams;

    fn execute(manager: &WhatsAppManager, params: Self::Params) -> BoxFuture<'_, GraphResult<Value>> {
        manager.send_contact(params).boxed()
    }
}
