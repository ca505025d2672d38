//! Configuration errors.

use thiserror::Error;

use cronvault_protocols::CoreError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Invalid config format: {0}")]
    InvalidFormat(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl From<ConfigError> for CoreError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound(_) => CoreError::not_found(err.to_string()),
            ConfigError::Io(_) => CoreError::server(err.to_string()),
            _ => CoreError::contract_invalid(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cronvault_protocols::ErrorKind;

    #[test]
    fn test_not_found_error() {
        let err = ConfigError::NotFound("cronvault.toml".to_string());
        assert!(err.to_string().contains("cronvault.toml"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_invalid_value_error() {
        let err = ConfigError::InvalidValue {
            field: "crypto.key_source".to_string(),
            message: "unknown key source".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("crypto.key_source"));
        assert!(display.contains("unknown key source"));
    }

    #[test]
    fn test_env_var_not_set_error() {
        let err = ConfigError::EnvVarNotSet("CRONVAULT_AES_KEY".to_string());
        assert!(err.to_string().contains("CRONVAULT_AES_KEY"));
        assert!(err.to_string().contains("not set"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ConfigError::from(io_err);
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_into_core_error_kinds() {
        let err: CoreError = ConfigError::NotFound("x".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err: CoreError = ConfigError::InvalidFormat("x".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::ContractInvalid);

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CoreError = ConfigError::Io(io_err).into();
        assert_eq!(err.kind(), ErrorKind::ServerError);
    }
}
