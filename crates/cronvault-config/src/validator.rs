//! Configuration validation.

use std::collections::HashSet;

use cronvault_protocols::{AdminState, ScheduleAction, ScheduleJob};

use crate::error::ConfigError;
use crate::schema::{Config, KEY_SOURCE_SECRET_STORE, KEY_SOURCE_SELF};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_scheduler(config, &mut result);
        Self::validate_crypto(config, &mut result);
        Self::validate_jobs(config, &mut result);

        result
    }

    fn validate_scheduler(config: &Config, result: &mut ValidationResult) {
        if config.scheduler.shutdown_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "scheduler.shutdown_timeout_secs",
                "shutdown_timeout_secs must be greater than 0",
            ));
        }

        if config.scheduler.http_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "scheduler.http_timeout_secs",
                "http_timeout_secs must be greater than 0",
            ));
        }

        if config.scheduler.record_capacity == 0 {
            result.add_error(ValidationError::new(
                "scheduler.record_capacity",
                "record_capacity must be greater than 0",
            ));
        }
    }

    fn validate_crypto(config: &Config, result: &mut ValidationResult) {
        let crypto = &config.crypto;
        let valid_sources = [KEY_SOURCE_SELF, KEY_SOURCE_SECRET_STORE];
        if !valid_sources.contains(&crypto.key_source.as_str()) {
            result.add_error(ValidationError::new(
                "crypto.key_source",
                format!(
                    "Unknown key source '{}', valid values: {:?}",
                    crypto.key_source, valid_sources
                ),
            ));
        }

        if let Some(ref key) = crypto.self_key {
            if ![16, 24, 32].contains(&key.len()) {
                result.add_error(ValidationError::new(
                    "crypto.self_key",
                    format!("key must be 16, 24 or 32 bytes long, got {}", key.len()),
                ));
            }
        }

        if crypto.uses_secret_store() && crypto.secret_file.is_none() {
            result.add_error(ValidationError::new(
                "crypto.secret_file",
                "secret_file is required when key_source is secret-store",
            ));
        }
    }

    fn validate_jobs(config: &Config, result: &mut ValidationResult) {
        let mut seen = HashSet::new();

        for (index, job) in config.jobs.iter().enumerate() {
            let path = format!("jobs[{}]", index);

            if job.name.trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("{}.name", path),
                    "job name cannot be empty",
                ));
            } else if !seen.insert(job.name.as_str()) {
                result.add_error(ValidationError::new(
                    format!("{}.name", path),
                    format!("duplicate job name '{}'", job.name),
                ));
            }

            if job.actions.is_empty() {
                result.add_error(ValidationError::new(
                    format!("{}.actions", path),
                    format!("job '{}' has no actions", job.name),
                ));
            }

            if job.admin_state == AdminState::Locked {
                result.add_warning(ValidationWarning::new(
                    format!("{}.admin_state", path),
                    format!("job '{}' is locked and will not be started", job.name),
                ));
            }

            Self::validate_actions(&path, job, result);
        }
    }

    fn validate_actions(path: &str, job: &ScheduleJob, result: &mut ValidationResult) {
        for (index, action) in job.actions.iter().enumerate() {
            if let ScheduleAction::Rest(rest) = action {
                match url::Url::parse(&rest.address) {
                    Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
                    Ok(_) => result.add_warning(ValidationWarning::new(
                        format!("{}.actions[{}].address", path, index),
                        "address should start with http:// or https://",
                    )),
                    Err(e) => result.add_error(ValidationError::new(
                        format!("{}.actions[{}].address", path, index),
                        format!("invalid address '{}': {}", rest.address, e),
                    )),
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
