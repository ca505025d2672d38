//! cronvault - named job scheduler with envelope encryption at rest
//!
//! Main entry point for the cronvault CLI.

mod cli;
mod cmd_crypto;
mod cmd_run;

use std::path::Path;

use clap::Parser;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use cronvault_config::{Config, ConfigError, ConfigLoader, LogConfig};

use crate::cli::{Cli, Commands, DEFAULT_CONFIG_PATH};

/// Load the configuration. A missing default file yields the defaults; an
/// explicitly given path must exist.
fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => ConfigLoader::load(path),
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.exists() {
                ConfigLoader::load(default)
            } else {
                Ok(Config::default())
            }
        }
    }
}

/// Initialize tracing with console output and, when configured, a daily
/// rolling log file.
fn init_tracing(log: &LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log.level))?;

    let file_layer = match &log.directory {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("cronvault")
                .filename_suffix("log")
                .max_log_files(30)
                .build(dir)?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Keeps the writer flushing for the lifetime of the process.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.log)?;

    match cli.command {
        Commands::Run => cmd_run::run(config).await,
        Commands::Validate => cmd_run::validate(&config),
        Commands::Encrypt { plaintext } => cmd_crypto::encrypt(&config.crypto, &plaintext).await,
        Commands::Decrypt { ciphertext } => {
            cmd_crypto::decrypt(&config.crypto, &ciphertext).await
        }
    }
}
