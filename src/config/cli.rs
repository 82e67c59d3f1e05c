//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// alert-courier: deliver alert notifications to a webhook
///
/// Reads a JSON array of alerts, links stored screenshots into the
/// payload and posts it once to the configured receiver.
#[derive(Debug, Parser)]
#[command(name = "alert-courier")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Receiver URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Path appended to the receiver URL
    #[arg(long)]
    pub path: Option<String>,

    /// Receiver name used in payloads and error messages
    #[arg(long)]
    pub name: Option<String>,

    /// Receiver integration type
    #[arg(long = "type", value_name = "TYPE")]
    pub receiver_type: Option<String>,

    /// HTTP Basic username
    #[arg(long)]
    pub username: Option<String>,

    /// HTTP Basic password
    #[arg(long)]
    pub password: Option<String>,

    /// Maximum number of images to link into a notification (0 disables)
    #[arg(long = "max-images")]
    pub max_images: Option<usize>,

    /// Directory holding `<token>.png` screenshots
    #[arg(long = "images-dir", value_name = "DIR")]
    pub images_dir: Option<PathBuf>,

    /// Public URL prefix the images directory is served under
    #[arg(long = "images-base-url", value_name = "URL")]
    pub images_base_url: Option<String>,

    /// JSON file with the alerts to send (default: stdin)
    #[arg(long, short)]
    pub alerts: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Print the payload instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for alert-courier
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = super::defaults::CONFIG_FILE)]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }
}
