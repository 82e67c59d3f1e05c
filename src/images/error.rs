//! Error types for image lookup and attachment.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Error type for image store lookups.
///
/// [`ImageError::NotFound`] and [`ImageError::Unavailable`] describe normal
/// steady-state conditions (an expired screenshot, a disabled feature) and
/// are turned into "no image" by the resolver. Every other variant is a
/// reportable failure.
#[derive(Debug, Error)]
pub enum ImageError {
    /// No image exists for the token.
    #[error("Image not found")]
    NotFound,

    /// Image storage is disabled or not configured.
    #[error("Images are unavailable")]
    Unavailable,

    /// The store did not answer within the lookup timeout.
    #[error("Image lookup timed out after {0:?}")]
    Timeout(Duration),

    /// Reading image data from disk failed.
    #[error("Failed to read image '{}': {source}", path.display())]
    Io {
        /// Path of the image file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Any other failure reported by a store implementation.
    #[error("Image store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ImageError {
    /// Returns true for the conditions that mean "no image" rather than failure.
    #[must_use]
    pub const fn is_absence(&self) -> bool {
        matches!(self, Self::NotFound | Self::Unavailable)
    }
}

/// Error returned by [`with_stored_images`](super::with_stored_images).
///
/// Generic over the visitor's own error type so callers get it back intact.
#[derive(Debug, Error)]
pub enum AttachError<E> {
    /// Looking up an alert's image failed.
    #[error("Failed to resolve image: {0}")]
    Resolve(#[source] ImageError),

    /// The visitor failed to attach a resolved image.
    #[error("Failed to attach image to notification: {0}")]
    Visit(#[source] E),
}
