//! Generic webhook notifier.
//!
//! Serialises a batch of alerts into a JSON envelope, links up to
//! `max_images` stored screenshots into it and delivers the result with a
//! single [`HttpDelivery::send`].

use std::collections::BTreeMap;
use std::convert::Infallible;

use serde::Serialize;
use thiserror::Error;

use crate::alert::{Alert, AlertStatus, IMAGE_TOKEN_ANNOTATION};
use crate::images::{AttachError, ImageStore, Visit, with_stored_images};
use crate::receiver::ReceiverRef;
use crate::time::{Clock, SystemClock};
use crate::webhook::{DeliveryConfig, DeliveryError, HttpClient, HttpDelivery};

#[cfg(test)]
#[path = "notifier_tests.rs"]
mod tests;

/// Validated settings of a webhook receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookSettings {
    /// Receiver identity, used in payloads and logs.
    pub receiver: ReceiverRef,
    /// Endpoint to POST to.
    pub url: url::Url,
    /// Basic auth username; empty for none.
    pub username: String,
    /// Basic auth password; empty for none.
    pub password: String,
    /// Maximum number of images linked into one payload.
    pub max_images: usize,
}

/// Error type for a notification attempt.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Resolving images failed.
    #[error(transparent)]
    Attach(#[from] AttachError<Infallible>),

    /// The payload could not be serialised.
    #[error("Failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),

    /// Delivering the payload failed.
    #[error(transparent)]
    Deliver(#[from] DeliveryError),
}

#[derive(Serialize)]
struct Payload<'a> {
    receiver: &'a str,
    status: AlertStatus,
    alerts: Vec<AlertEntry<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AlertEntry<'a> {
    status: AlertStatus,
    fingerprint: String,
    labels: &'a BTreeMap<String, String>,
    annotations: BTreeMap<&'a str, &'a str>,
    #[serde(rename = "generatorURL", skip_serializing_if = "Option::is_none")]
    generator_url: Option<&'a str>,
    #[serde(rename = "imageURL", skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
}

impl<'a> AlertEntry<'a> {
    fn new(alert: &'a Alert, clock: &impl Clock) -> Self {
        // The token is an internal handle; the resolved URL replaces it.
        let annotations = alert
            .annotations
            .iter()
            .filter(|(name, _)| name.as_str() != IMAGE_TOKEN_ANNOTATION)
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();

        Self {
            status: alert.status(clock),
            fingerprint: alert.fingerprint().to_string(),
            labels: &alert.labels,
            annotations,
            generator_url: alert.generator_url.as_deref(),
            image_url: None,
        }
    }
}

/// Notifier posting alert batches to a generic webhook.
#[derive(Debug)]
pub struct WebhookNotifier<H, S, C = SystemClock> {
    settings: WebhookSettings,
    delivery: HttpDelivery<H>,
    images: S,
    clock: C,
}

impl<H, S> WebhookNotifier<H, S, SystemClock> {
    /// Creates a notifier using the system clock.
    #[must_use]
    pub const fn new(settings: WebhookSettings, client: H, images: S) -> Self {
        Self {
            settings,
            delivery: HttpDelivery::new(client),
            images,
            clock: SystemClock,
        }
    }
}

impl<H, S, C> WebhookNotifier<H, S, C> {
    /// Replaces the time source used to derive alert status.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> WebhookNotifier<H, S, C2> {
        WebhookNotifier {
            settings: self.settings,
            delivery: self.delivery,
            images: self.images,
            clock,
        }
    }

    /// Returns the receiver settings.
    #[must_use]
    pub const fn settings(&self) -> &WebhookSettings {
        &self.settings
    }
}

impl<H: HttpClient, S: ImageStore, C: Clock> WebhookNotifier<H, S, C> {
    /// Builds the JSON payload for `alerts`.
    ///
    /// Images without a public URL cannot be linked and are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Attach`] if an image lookup fails.
    pub async fn build_payload(&self, alerts: &[Alert]) -> Result<Vec<u8>, NotifyError> {
        let mut entries: Vec<AlertEntry<'_>> = alerts
            .iter()
            .map(|alert| AlertEntry::new(alert, &self.clock))
            .collect();

        if self.settings.max_images > 0 {
            let mut attached = 0;
            with_stored_images(&self.images, alerts, |index, image| {
                let Some(url) = &image.url else {
                    return Ok::<_, Infallible>(Visit::Continue);
                };
                entries[index].image_url = Some(url.clone());
                attached += 1;
                Ok(if attached >= self.settings.max_images {
                    Visit::Stop
                } else {
                    Visit::Continue
                })
            })
            .await?;
        }

        let payload = Payload {
            receiver: &self.settings.receiver.name,
            status: AlertStatus::of_batch(alerts, &self.clock),
            alerts: entries,
        };

        Ok(serde_json::to_vec(&payload)?)
    }

    /// Builds the payload for `alerts` and delivers it once.
    ///
    /// Returns the endpoint's response body.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if image resolution, encoding or delivery fails.
    pub async fn notify(&self, alerts: &[Alert]) -> Result<Vec<u8>, NotifyError> {
        let body = self.build_payload(alerts).await?;
        let config = DeliveryConfig::new(body)
            .with_basic_auth(&self.settings.username, &self.settings.password);

        tracing::debug!(
            receiver = %self.settings.receiver.name,
            kind = %self.settings.receiver.kind,
            alerts = alerts.len(),
            "Delivering notification"
        );

        Ok(self.delivery.send(&self.settings.url, config).await?)
    }
}
