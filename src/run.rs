//! Application execution logic.
//!
//! Reads the alert batch, wires the image store and HTTP client into a
//! [`WebhookNotifier`] and performs one notification.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::signal;

use alert_courier::alert::Alert;
use alert_courier::config::{ImageSettings, ValidatedConfig};
use alert_courier::images::{DirImageStore, Image, ImageError, ImageStore, UnavailableImageStore};
use alert_courier::notifier::{NotifyError, WebhookNotifier};
use alert_courier::webhook::{HttpError, ReqwestClient};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The alerts input could not be read.
    #[error("Failed to read alerts from {origin}: {source}")]
    ReadAlerts {
        /// File path or `stdin`
        origin: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The alerts input is not valid JSON.
    #[error("Failed to parse alerts: {0}")]
    ParseAlerts(#[from] serde_json::Error),

    /// The HTTP client could not be created.
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] HttpError),

    /// Building or delivering the notification failed.
    #[error(transparent)]
    Notify(#[from] NotifyError),

    /// A shutdown signal arrived before the notification completed.
    #[error("Interrupted before the notification completed")]
    Interrupted,

    /// Writing the result to stdout failed.
    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

/// Accepted shapes of the alerts input.
#[derive(Deserialize)]
#[serde(untagged)]
enum AlertsDocument {
    /// A bare JSON array of alerts.
    List(Vec<Alert>),
    /// An object with an `alerts` array.
    Envelope { alerts: Vec<Alert> },
}

/// Image store selected by configuration.
#[derive(Debug, Clone)]
enum AppImageStore {
    Dir(DirImageStore),
    Disabled(UnavailableImageStore),
}

impl From<&ImageSettings> for AppImageStore {
    fn from(settings: &ImageSettings) -> Self {
        let Some(dir) = &settings.dir else {
            return Self::Disabled(UnavailableImageStore);
        };

        let mut store = DirImageStore::new(dir);
        if let Some(base_url) = &settings.base_url {
            store = store.with_base_url(base_url);
        }
        Self::Dir(store)
    }
}

impl ImageStore for AppImageStore {
    async fn get_image(&self, token: &str) -> Result<Image, ImageError> {
        match self {
            Self::Dir(store) => store.get_image(token).await,
            Self::Disabled(store) => store.get_image(token).await,
        }
    }
}

/// Executes one notification.
///
/// In dry-run mode the payload is printed to stdout instead of being sent;
/// otherwise the endpoint's response body is printed.
///
/// # Errors
///
/// Returns an error if:
/// - The alerts cannot be read or parsed
/// - An image lookup fails
/// - The delivery fails
/// - A shutdown signal arrives first
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let alerts = read_alerts(config.alerts.as_deref()).await?;
    if alerts.is_empty() {
        tracing::info!("No alerts to send");
        return Ok(());
    }

    let dry_run = config.dry_run;
    let client = ReqwestClient::new().map_err(RunError::Client)?;
    let images = AppImageStore::from(&config.images);
    let notifier = WebhookNotifier::new(config.webhook, client, images);

    let work = async {
        if dry_run {
            tracing::info!("Dry-run mode enabled - payload will be printed, not sent");
            return notifier.build_payload(&alerts).await;
        }

        let response = notifier.notify(&alerts).await?;
        tracing::info!(
            alerts = alerts.len(),
            url = %notifier.settings().url,
            "Notification delivered"
        );
        Ok(response)
    };

    // Dropping `work` on shutdown aborts any in-flight lookup or request.
    let output = tokio::select! {
        biased;

        () = shutdown_signal() => {
            tracing::warn!("Shutdown signal received, abandoning notification");
            return Err(RunError::Interrupted);
        }

        output = work => output?,
    };

    write_stdout(&output).await
}

/// Reads alerts from `path`, or from stdin when `None`.
async fn read_alerts(path: Option<&Path>) -> Result<Vec<Alert>, RunError> {
    let raw = match path {
        Some(path) => tokio::fs::read(path)
            .await
            .map_err(|e| RunError::ReadAlerts {
                origin: path.display().to_string(),
                source: e,
            })?,
        None => {
            let mut buf = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut buf)
                .await
                .map_err(|e| RunError::ReadAlerts {
                    origin: "stdin".to_string(),
                    source: e,
                })?;
            buf
        }
    };

    parse_alerts(&raw)
}

fn parse_alerts(raw: &[u8]) -> Result<Vec<Alert>, RunError> {
    let alerts = match serde_json::from_slice(raw)? {
        AlertsDocument::List(alerts) | AlertsDocument::Envelope { alerts } => alerts,
    };
    Ok(alerts)
}

async fn write_stdout(bytes: &[u8]) -> Result<(), RunError> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(bytes).await.map_err(RunError::Output)?;
    stdout.write_all(b"\n").await.map_err(RunError::Output)?;
    stdout.flush().await.map_err(RunError::Output)
}

/// Completes on Ctrl+C or SIGTERM.
///
/// If a handler cannot be installed the corresponding branch never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
