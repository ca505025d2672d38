//! Secret store errors.

use thiserror::Error;

use super::CoreError;

/// Errors returned by a [`SecretProvider`](crate::SecretProvider).
#[derive(Debug, Error)]
pub enum SecretError {
    /// No secret is stored under the name. Not fatal for key seeding.
    #[error("Secret not found: {0}")]
    NotFound(String),

    /// The secret store could not be reached or refused the request.
    #[error("Secret store unavailable: {0}")]
    Unavailable(String),
}

impl From<SecretError> for CoreError {
    fn from(err: SecretError) -> Self {
        match err {
            SecretError::NotFound(_) => CoreError::not_found(err.to_string()),
            SecretError::Unavailable(_) => CoreError::server(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_not_found_maps_to_not_found() {
        let err: CoreError = SecretError::NotFound("aes".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("aes"));
    }

    #[test]
    fn test_unavailable_maps_to_server_error() {
        let err: CoreError = SecretError::Unavailable("connection refused".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::ServerError);
    }
}
