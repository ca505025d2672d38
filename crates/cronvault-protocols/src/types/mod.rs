//! Data model shared across the cronvault crates.

mod action;
mod job;
mod key;
mod record;

pub use action::*;
pub use job::*;
pub use key::*;
pub use record::*;

/// Content type used when an action does not declare one.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// API version stamped on published message envelopes.
pub const API_VERSION: &str = "v1";
