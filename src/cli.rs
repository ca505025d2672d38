//! CLI definitions for cronvault.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Configuration file used when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_PATH: &str = "config/cronvault.toml";

/// cronvault CLI.
#[derive(Parser)]
#[command(name = "cronvault")]
#[command(about = "Named job scheduler with envelope encryption at rest")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "CRONVAULT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Schedule the configured jobs and run until Ctrl-C
    Run,

    /// Check the configuration and print errors and warnings
    Validate,

    /// Encrypt a value with the configured key source
    Encrypt {
        /// Plaintext to encrypt
        plaintext: String,
    },

    /// Decrypt a base64 envelope produced by `encrypt`
    Decrypt {
        /// Base64 ciphertext
        ciphertext: String,
    },
}
