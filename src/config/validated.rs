//! Validated configuration after merging CLI and TOML sources.

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use crate::notifier::WebhookSettings;
use crate::receiver::{ReceiverRef, ReceiverValidationError};
use crate::webhook::join_url_path;

use super::cli::Cli;
use super::defaults;
use super::error::ConfigError;
use super::toml::TomlConfig;

/// Image store settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSettings {
    /// Directory holding screenshots; `None` disables images.
    pub dir: Option<PathBuf>,
    /// Public URL prefix of the directory.
    pub base_url: Option<String>,
}

/// Fully validated configuration ready for use by the application.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Receiver settings
    pub webhook: WebhookSettings,

    /// Image store settings
    pub images: ImageSettings,

    /// Alerts file; `None` reads standard input
    pub alerts: Option<PathBuf>,

    /// Print the payload instead of sending it
    pub dry_run: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let images = self
            .images
            .dir
            .as_ref()
            .map_or_else(|| "disabled".to_string(), |p| p.display().to_string());
        let auth = if self.webhook.username.is_empty() {
            "none"
        } else {
            "basic"
        };

        write!(
            f,
            "Config {{ receiver: {:?} ({}), url: {}, auth: {}, max_images: {}, images: {}, dry_run: {} }}",
            self.webhook.receiver.name,
            self.webhook.receiver.kind,
            self.webhook.url,
            auth,
            self.webhook.max_images,
            images,
            self.dry_run,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Receiver`] if the receiver URL is missing,
    /// invalid or not HTTP(S), or if only half of the basic credentials are
    /// set; [`ConfigError::InvalidImageUrl`] for a bad image base URL.
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let webhook = Self::resolve_webhook(cli, toml)?;
        let images = Self::resolve_images(cli, toml)?;

        Ok(Self {
            webhook,
            images,
            alerts: cli.alerts.clone(),
            dry_run: cli.dry_run,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_webhook(cli: &Cli, toml: Option<&TomlConfig>) -> Result<WebhookSettings, ConfigError> {
        let section = toml.map(|t| &t.receiver);

        // Priority: CLI explicit > TOML > default
        let name = cli
            .name
            .as_deref()
            .or_else(|| section.and_then(|s| s.name.as_deref()))
            .unwrap_or_default();
        let kind = cli
            .receiver_type
            .as_deref()
            .or_else(|| section.and_then(|s| s.kind.as_deref()))
            .unwrap_or(defaults::RECEIVER_TYPE);
        let receiver = ReceiverRef::new(name, kind);

        let raw_url = cli
            .url
            .as_deref()
            .or_else(|| section.and_then(|s| s.url.as_deref()))
            .filter(|u| !u.is_empty())
            .ok_or_else(|| invalid(&receiver, "could not find url property in settings"))?;
        let path = cli
            .path
            .as_deref()
            .or_else(|| section.and_then(|s| s.path.as_deref()));
        let url = parse_receiver_url(&receiver, raw_url, path)?;

        let username = cli
            .username
            .as_deref()
            .or_else(|| section.and_then(|s| s.username.as_deref()))
            .unwrap_or_default();
        let password = cli
            .password
            .as_deref()
            .or_else(|| section.and_then(|s| s.password.as_deref()))
            .unwrap_or_default();
        if username.is_empty() != password.is_empty() {
            return Err(invalid(
                &receiver,
                "basic authentication requires both username and password",
            ));
        }

        let max_images = cli
            .max_images
            .or_else(|| section.and_then(|s| s.max_images))
            .unwrap_or(defaults::MAX_IMAGES);

        Ok(WebhookSettings {
            receiver,
            url,
            username: username.to_string(),
            password: password.to_string(),
            max_images,
        })
    }

    fn resolve_images(cli: &Cli, toml: Option<&TomlConfig>) -> Result<ImageSettings, ConfigError> {
        let section = toml.map(|t| &t.images);

        let dir = cli
            .images_dir
            .clone()
            .or_else(|| section.and_then(|s| s.dir.clone()))
            .map(|p| expand_home(&p));

        let base_url = cli
            .images_base_url
            .clone()
            .or_else(|| section.and_then(|s| s.base_url.clone()));

        if let Some(ref url) = base_url {
            Url::parse(url).map_err(|e| ConfigError::InvalidImageUrl {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        }

        Ok(ImageSettings { dir, base_url })
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn invalid(receiver: &ReceiverRef, reason: &str) -> ConfigError {
    ReceiverValidationError::new(receiver.clone(), reason).into()
}

fn parse_receiver_url(
    receiver: &ReceiverRef,
    raw: &str,
    path: Option<&str>,
) -> Result<Url, ConfigError> {
    let joined = path.map_or_else(|| raw.to_string(), |p| join_url_path(raw, p));

    let url = Url::parse(&joined).map_err(|e| {
        ConfigError::from(ReceiverValidationError::new(receiver.clone(), "invalid url").with_source(e))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            receiver,
            &format!("unsupported url scheme {:?}", url.scheme()),
        ));
    }

    Ok(url)
}

/// Expands a leading `~` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir().map_or_else(|| path.to_path_buf(), |home| home.join(rest)),
        Err(_) => path.to_path_buf(),
    }
}
