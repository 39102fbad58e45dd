//! WhatsApp Business Cloud API operations.
//!
//! `WhatsAppManager` turns validated tool arguments into Graph API requests
//! and sends them through a `GraphTransport`.

mod manager;

pub use manager::{MESSAGING_PRODUCT, WhatsAppManager};
