//! Default values for configuration options.

/// Integration type reported for receivers that do not name one.
pub const RECEIVER_TYPE: &str = "webhook";

/// Maximum number of images linked into one notification.
pub const MAX_IMAGES: usize = 1;

/// Config file written by `alert-courier init`.
pub const CONFIG_FILE: &str = "alert-courier.toml";
