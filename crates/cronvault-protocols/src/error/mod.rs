//! Error types for the cronvault protocol layer.

mod core_error;
mod secret;

pub use core_error::*;
pub use secret::*;
