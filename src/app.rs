//! Process-level plumbing for the `alert-courier` binary.
//!
//! Maps configuration and run failures to exit codes and operator hints,
//! and installs the stderr log subscriber. stdout is reserved for the
//! endpoint's response or the dry-run payload.

use alert_courier::config::ConfigError;
use alert_courier::notifier::NotifyError;
use alert_courier::webhook::DeliveryError;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::run::RunError;

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Alerts unreadable, image store failure or transport failure.
    pub const RUNTIME: u8 = 2;

    /// The endpoint answered with a non-2xx status.
    pub const REJECTED: u8 = 3;

    /// Stopped by Ctrl+C or SIGTERM (128 + SIGINT).
    pub const INTERRUPTED: u8 = 130;

    /// Success.
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (1): invalid arguments, config file or receiver settings.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Converts a raw code.
    pub fn code(raw: u8) -> ExitCode {
        ExitCode::from(raw)
    }
}

/// Returns the exit code for a failed run.
pub const fn run_failure_code(error: &RunError) -> u8 {
    match error {
        RunError::Interrupted => exit_code::INTERRUPTED,
        RunError::Notify(NotifyError::Deliver(DeliveryError::Status { .. })) => exit_code::REJECTED,
        _ => exit_code::RUNTIME,
    }
}

/// Returns an operator hint for a configuration error, if one helps.
pub fn config_hint(error: &ConfigError) -> Option<&'static str> {
    match error {
        ConfigError::FileRead { .. } => {
            Some("Run 'alert-courier init' to generate a configuration template.")
        }
        ConfigError::Receiver(e) if e.reason().contains("url") => Some(
            "Set the endpoint with --url or `url` under [receiver]; only http and https are supported.",
        ),
        ConfigError::Receiver(_) => Some(
            "Pass --username and --password together, or set both under [receiver].",
        ),
        ConfigError::InvalidImageUrl { .. } => Some(
            "images.base_url must be absolute, e.g. https://grafana.example.com/public/img/attachments",
        ),
        ConfigError::TomlParse(_) | ConfigError::FileWrite { .. } => None,
    }
}

/// Prints the hint for `error` to stderr.
pub fn print_config_hint(error: &ConfigError) {
    if let Some(hint) = config_hint(error) {
        eprintln!("\n{hint}");
    }
}

/// Sets up the tracing subscriber for logging.
///
/// `-v` raises the crate's own level to debug; HTTP internals stay at warn
/// unless `RUST_LOG` says otherwise.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let mut filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_none() {
        for directive in ["hyper_util=warn", "reqwest=warn"] {
            if let Ok(directive) = directive.parse() {
                filter = filter.add_directive(directive);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
