//! CLI command implementations.

pub mod config;
pub mod invoke;

use clap::{Args, Subcommand};

/// Arguments for the invoke command.
#[derive(Args)]
pub struct InvokeArgs {
    /// Gateway event JSON file.
    #[arg(short, long)]
    pub event: String,

    /// Recorded dispatcher response JSON file.
    #[arg(short, long)]
    pub response: String,

    /// Override the request id taken from the event context.
    #[arg(long)]
    pub request_id: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Set a config value.
    Set {
        /// Config key (dot-separated).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
