//! alert-courier: alert notification delivery
//!
//! Reads a batch of alerts, links their screenshots and posts one payload
//! to the configured receiver.

use alert_courier::config::{Cli, Command, ValidatedConfig, write_default_config};
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_config_hint, run_failure_code, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    if let Some(Command::Init { output }) = &cli.command {
        return handle_init(output);
    }

    let config = match ValidatedConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            return exit_code::CONFIG_ERROR;
        }
    };

    setup_tracing(config.verbose);
    tracing::info!("{config}");
    if config.alerts.is_none() {
        tracing::debug!("No --alerts file given, reading alerts from stdin");
    }

    deliver(config)
}

/// Writes the config template for `alert-courier init`.
///
/// Refuses to replace an existing file.
fn handle_init(output: &std::path::Path) -> ExitCode {
    if output.exists() {
        eprintln!(
            "Error: {} already exists; remove it or pass --output",
            output.display()
        );
        return exit_code::CONFIG_ERROR;
    }

    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            println!(
                "Set [receiver].url, then pipe alerts in: alert-courier -c {} < alerts.json",
                output.display()
            );
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Performs the single notification and maps its outcome to an exit code.
///
/// Excluded from coverage - requires async runtime.
#[cfg(not(tarpaulin_include))]
fn deliver(config: ValidatedConfig) -> ExitCode {
    let receiver = config.webhook.receiver.name.clone();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create Tokio runtime: {e}");
            return exit_code::code(exit_code::RUNTIME);
        }
    };

    match runtime.block_on(run::execute(config)) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            let code = run_failure_code(&e);
            tracing::error!(receiver = %receiver, exit_code = code, "Notification failed: {e}");
            exit_code::code(code)
        }
    }
}
