//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let mut config: Config = toml::from_str(&expanded)?;
        Self::expand_paths(&mut config);
        Ok(config)
    }

    /// Expand environment variables in the format `${VAR}`. Comment lines
    /// are left untouched.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        let mut lines = Vec::new();
        for line in content.lines() {
            let mut expanded = line.to_string();
            if !line.trim_start().starts_with('#') {
                for cap in re.captures_iter(line) {
                    let var_name = &cap[1];
                    let var_value = std::env::var(var_name)
                        .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
                    expanded = expanded.replace(&cap[0], &var_value);
                }
            }
            lines.push(expanded);
        }

        Ok(lines.join("\n"))
    }

    fn expand_paths(config: &mut Config) {
        if let Some(dir) = config.log.directory.take() {
            config.log.directory = Some(Self::expand_pathbuf(&dir));
        }
        if let Some(file) = config.crypto.secret_file.take() {
            config.crypto.secret_file = Some(Self::expand_pathbuf(&file));
        }
    }

    fn expand_pathbuf(path: &Path) -> PathBuf {
        PathBuf::from(Self::expand_path(&path.to_string_lossy()))
    }

    /// Expand shell-style paths (e.g., `~/.cronvault`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
