//! Message-sending tools.
//!
//! Every tool here posts to `<phone-number-id>/messages` with the common
//! `messaging_product` / `recipient_type` / `to` / `type` envelope.

pub mod contact;
pub mod location;
pub mod media;
pub mod template;
pub mod text;

pub use contact::{SendContactParams, SendContactTool};
pub use location::{SendLocationParams, SendLocationTool};
pub use media::{
    SendDocumentParams, SendDocumentTool, SendImageParams, SendImageTool, SendVideoParams,
    SendVideoTool,
};
pub use template::{SendTemplateParams, SendTemplateTool};
pub use text::{SendTextParams, SendTextTool};
