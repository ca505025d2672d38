//! Configuration schema definitions.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use cronvault_protocols::ScheduleJob;

/// Key source tag for the compiled-in key.
pub const KEY_SOURCE_SELF: &str = "self";

/// Key source tag for the secret-store managed key.
pub const KEY_SOURCE_SECRET_STORE: &str = "secret-store";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub scheduler: SchedulerConfig,

    #[serde(default)]
    pub crypto: CryptoConfig,

    /// Jobs registered at start-up.
    #[serde(default)]
    pub jobs: Vec<ScheduleJob>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily rolling log files. Console only when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Scheduler manager configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Upper bound for the graceful teardown of one job.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Timeout applied to REST action requests.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Action run records kept in memory; the oldest are dropped first.
    #[serde(default = "default_record_capacity")]
    pub record_capacity: usize,
}

impl SchedulerConfig {
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            shutdown_timeout_secs: default_shutdown_timeout(),
            http_timeout_secs: default_http_timeout(),
            user_agent: default_user_agent(),
            record_capacity: default_record_capacity(),
        }
    }
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_http_timeout() -> u64 {
    30
}

fn default_record_capacity() -> usize {
    10_000
}

fn default_user_agent() -> String {
    format!("cronvault/{}", env!("CARGO_PKG_VERSION"))
}

/// Encryption-at-rest configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoConfig {
    /// `"self"` or `"secret-store"`.
    #[serde(default = "default_key_source")]
    pub key_source: String,

    /// Overrides the compiled-in key. Raw bytes, 16, 24 or 32 long.
    #[serde(default)]
    pub self_key: Option<String>,

    /// JSON file backing the secret store.
    #[serde(default)]
    pub secret_file: Option<PathBuf>,
}

impl CryptoConfig {
    pub fn uses_secret_store(&self) -> bool {
        self.key_source == KEY_SOURCE_SECRET_STORE
    }
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            key_source: default_key_source(),
            self_key: None,
            secret_file: None,
        }
    }
}

fn default_key_source() -> String {
    KEY_SOURCE_SELF.to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
