//! Configuration layer for alert-courier.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments**
//! 2. **TOML config file**
//! 3. **Built-in defaults**
//!
//! The receiver URL has no default. When it is missing or invalid the
//! error is a [`ReceiverValidationError`](crate::receiver::ReceiverValidationError)
//! naming the receiver.
//!
//! # Fixed Parameters
//!
//! The HTTP transport timeouts and the image lookup timeout are not
//! configurable; see [`TransportPolicy`](crate::webhook::TransportPolicy)
//! and [`IMAGE_STORE_TIMEOUT`](crate::images::IMAGE_STORE_TIMEOUT).

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;


pub use cli::{Cli, Command};
pub use error::ConfigError;
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ImageSettings, ValidatedConfig, write_default_config};
