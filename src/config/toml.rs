//! TOML configuration file parsing.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional so a file can be combined with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Receiver section
    #[serde(default)]
    pub receiver: ReceiverSection,

    /// Image store section
    #[serde(default)]
    pub images: ImagesSection,
}

/// Receiver configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReceiverSection {
    /// Receiver name
    pub name: Option<String>,

    /// Integration type
    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// Receiver URL
    pub url: Option<String>,

    /// Path appended to the URL
    pub path: Option<String>,

    /// HTTP Basic username
    pub username: Option<String>,

    /// HTTP Basic password
    pub password: Option<String>,

    /// Maximum images per notification
    pub max_images: Option<usize>,
}

/// Image store configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImagesSection {
    /// Directory holding `<token>.png` files
    pub dir: Option<PathBuf>,

    /// Public URL prefix of the directory
    pub base_url: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# alert-courier configuration file

[receiver]
# Receiver name, shown in payloads and validation errors
# name = "ops"

# Integration type (default: webhook)
# type = "webhook"

# Endpoint URL (required)
# url = "https://hooks.example.com"

# Path appended to the URL
# path = "/alerts"

# HTTP Basic credentials, sent only when both are set
# username = "alerting"
# password = "secret"

# Maximum number of images linked into one notification (default: 1, 0 disables)
# max_images = 1

[images]
# Directory holding <token>.png screenshots (unset: images unavailable)
# dir = "~/.local/share/alert-courier/images"

# Public URL prefix under which the directory is served
# base_url = "https://grafana.example.com/public/img/attachments"
"#
    .to_string()
}
