//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each family of tools is defined in its own module; `common` holds the
//! `WhatsAppTool` contract they all implement.

pub mod account;
pub mod common;
pub mod messages;

pub use account::{
    GetBusinessProfileParams, GetBusinessProfileTool, MarkMessageAsReadParams,
    MarkMessageAsReadTool,
};
pub use common::{Validate, Violations, WhatsAppTool};
pub use messages::{
    SendContactParams, SendContactTool, SendDocumentParams, SendDocumentTool, SendImageParams,
    SendImageTool, SendLocationParams, SendLocationTool, SendTemplateParams, SendTemplateTool,
    SendTextParams, SendTextTool, SendVideoParams, SendVideoTool,
};
