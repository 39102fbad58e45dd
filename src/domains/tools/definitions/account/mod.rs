//! Tools that act on the business account rather than send messages.

pub mod business_profile;
pub mod mark_read;

pub use business_profile::{GetBusinessProfileParams, GetBusinessProfileTool};
pub use mark_read::{MarkMessageAsReadParams, MarkMessageAsReadTool};
