//! Domains module containing business logic organized by bounded contexts.
//!
//! - **tools**: the MCP tool surface (schemas, registry, router)
//! - **whatsapp**: request construction for the WhatsApp Business Cloud API

pub mod tools;
pub mod whatsapp;
