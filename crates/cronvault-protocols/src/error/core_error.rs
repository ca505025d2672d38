//! Structured error shared by every cronvault component.
//!
//! Callers branch on [`ErrorKind`], never on the message. Wrapping an error
//! with [`CoreError::context`] annotates the message and keeps the kind.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for cronvault operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed input: bad definition, missing action fields, bad envelope.
    ContractInvalid,
    /// Duplicate job name.
    Conflict,
    /// Unknown job name, missing secret or key.
    NotFound,
    /// Cipher, random source, secret store or engine failure.
    ServerError,
}

impl ErrorKind {
    /// HTTP status a thin transport layer reports for this kind.
    pub fn http_status(self) -> u16 {
        match self {
            Self::ContractInvalid => 400,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::ServerError => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ContractInvalid => "ContractInvalid",
            Self::Conflict => "Conflict",
            Self::NotFound => "NotFound",
            Self::ServerError => "ServerError",
        };
        f.write_str(name)
    }
}

/// Error carrying a kind, a human readable message and an optional cause.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CoreError {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl CoreError {
    /// Create an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn contract_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ContractInvalid, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServerError, message)
    }

    /// Attach the underlying cause.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Prefix the message with `context`, keeping the kind and the cause.
    pub fn context(mut self, context: impl fmt::Display) -> Self {
        self.message = format!("{}: {}", context, self.message);
        self
    }

    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the message without the cause.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    pub fn is_conflict(&self) -> bool {
        self.kind == ErrorKind::Conflict
    }
}

#[cfg(test)]
#[path = "core_error_tests.rs"]
mod tests;
