//! # Cronvault Protocols
//!
//! Shared definitions for the cronvault workspace.
//! Contains only the data model, the error contract and collaborator
//! interfaces - no implementations.
//!
//! ## Core Traits
//!
//! - [`MessagePublisher`] - Publishes message-bus actions
//! - [`CommandClient`] - Issues device set-commands
//! - [`TokenProvider`] - Supplies bearer tokens for REST actions
//! - [`ActionRecordSink`] - Receives the outcome of every action run
//! - [`SecretProvider`] - Secret store used to seed the AES key
//! - [`KeyStore`] - Persistence for encrypted signing/verification keys
//! - [`Crypto`] - Encrypt/decrypt contract implemented by the envelope codec

pub mod collaborator;
pub mod error;
pub mod types;

pub use collaborator::{
    ActionRecordSink, CommandClient, CommandResponse, Crypto, KeyStore, MessageEnvelope,
    MessagePublisher, SecretProvider, TokenProvider,
};
pub use error::{CoreError, CoreResult, ErrorKind, SecretError};
pub use types::*;
