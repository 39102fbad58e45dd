//! Graph API client.
//!
//! Every WhatsApp operation is a single call against the Meta Graph API.
//! This module holds the request shape the manager builds (`GraphRequest`),
//! the `GraphTransport` seam it is sent through, and the reqwest-backed
//! `GraphApiClient` used in production.

mod client;
mod error;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{GraphApiClient, GraphRequest, GraphTransport, HttpMethod};
pub use error::{GraphApiError, GraphResult};
