//! Interfaces of the external collaborators cronvault talks to.
//!
//! Implementations live elsewhere (message bus clients, HTTP services,
//! secret stores, databases); only the narrow contracts are defined here.

mod command;
mod crypto;
mod messaging;
mod persistence;
mod record;
mod secret;
mod token;

pub use command::{CommandClient, CommandResponse};
pub use crypto::Crypto;
pub use messaging::{MessageEnvelope, MessagePublisher};
pub use persistence::KeyStore;
pub use record::ActionRecordSink;
pub use secret::SecretProvider;
pub use token::TokenProvider;
