//! Resolution of alert images and batch attachment.

use std::fmt;
use std::time::Duration;

use crate::alert::Alert;

use super::{AttachError, Image, ImageError, ImageStore};

/// Upper bound on a single image store lookup.
///
/// Applies regardless of how long the caller is prepared to wait; the
/// caller can still abandon the lookup earlier by dropping the future.
pub const IMAGE_STORE_TIMEOUT: Duration = Duration::from_millis(500);

/// Outcome of resolving an alert's image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The alert has a stored image.
    Found(Image),
    /// The alert has no token, or its image is gone or disabled.
    Absent,
}

impl Resolution {
    /// Returns the image, if one was found.
    #[must_use]
    pub fn into_image(self) -> Option<Image> {
        match self {
            Self::Found(image) => Some(image),
            Self::Absent => None,
        }
    }

    /// Returns true if an image was found.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Visitor verdict after handling one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Keep going with the next alert.
    Continue,
    /// Enough images were collected; finish successfully.
    Stop,
}

/// Resolves the image attached to `alert`, if any.
///
/// # Errors
///
/// Returns the store's error for anything other than a missing image or a
/// disabled store, including [`ImageError::Timeout`] when the lookup exceeds
/// [`IMAGE_STORE_TIMEOUT`].
pub async fn resolve_image<S>(store: &S, alert: &Alert) -> Result<Resolution, ImageError>
where
    S: ImageStore + ?Sized,
{
    let Some(token) = alert.image_token() else {
        return Ok(Resolution::Absent);
    };

    let lookup = tokio::time::timeout(IMAGE_STORE_TIMEOUT, store.get_image(token))
        .await
        .unwrap_or_else(|_elapsed| Err(ImageError::Timeout(IMAGE_STORE_TIMEOUT)));

    match lookup {
        Ok(image) => Ok(Resolution::Found(image)),
        Err(e) if e.is_absence() => {
            tracing::debug!(token, alert = %alert, reason = %e, "No image attached");
            Ok(Resolution::Absent)
        }
        Err(e) => {
            tracing::warn!(token, alert = %alert, error = %e, "Failed to get image with token");
            Err(e)
        }
    }
}

/// Resolves the image of each alert and hands it to `visit`.
///
/// Alerts are processed in order; `visit` receives the alert's position in
/// `alerts` and the resolved image. Alerts without an image are skipped.
///
/// Iteration ends early when:
/// - a lookup fails: the error is returned as [`AttachError::Resolve`];
/// - `visit` returns [`Visit::Stop`]: the call succeeds;
/// - `visit` fails: the error is logged and returned as [`AttachError::Visit`].
///
/// # Errors
///
/// See above. Images visited before a failure stay visited.
pub async fn with_stored_images<S, F, E>(
    store: &S,
    alerts: &[Alert],
    mut visit: F,
) -> Result<(), AttachError<E>>
where
    S: ImageStore + ?Sized,
    F: FnMut(usize, &Image) -> Result<Visit, E>,
    E: fmt::Display,
{
    for (index, alert) in alerts.iter().enumerate() {
        let resolution = resolve_image(store, alert)
            .await
            .map_err(AttachError::Resolve)?;

        let Resolution::Found(image) = resolution else {
            continue;
        };

        match visit(index, &image) {
            Ok(Visit::Continue) => {}
            Ok(Visit::Stop) => return Ok(()),
            Err(e) => {
                tracing::error!(alert = %alert, error = %e, "Failed to attach image to notification");
                return Err(AttachError::Visit(e));
            }
        }
    }

    Ok(())
}
