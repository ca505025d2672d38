//! # Cronvault Config
//!
//! Configuration management for cronvault: TOML schema, loading with
//! `${VAR}` substitution, and validation.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
