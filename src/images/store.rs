//! Image store trait and implementations.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::webhook::join_url_path;

use super::ImageError;

/// A stored screenshot that can be attached to a notification.
///
/// Carries enough for a notifier to embed it: a local path for uploads,
/// a public URL for link-style embeds, or both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Token the image was stored under.
    pub token: String,
    /// Local file holding the image data.
    pub path: Option<PathBuf>,
    /// Publicly reachable URL of the image.
    pub url: Option<String>,
    /// When the image was written.
    pub created_at: Option<DateTime<Utc>>,
}

impl Image {
    /// Creates an image with only a token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            path: None,
            url: None,
            created_at: None,
        }
    }

    /// Sets the local path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the public URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Lookup of stored images by token.
///
/// Implementations report a missing image with [`ImageError::NotFound`] and
/// a disabled store with [`ImageError::Unavailable`]; the resolver treats
/// both as "no image".
pub trait ImageStore: Send + Sync {
    /// Fetches the image stored under `token`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError`] if the image is absent or cannot be read.
    fn get_image(&self, token: &str) -> impl Future<Output = Result<Image, ImageError>> + Send;
}

impl<T: ImageStore + ?Sized> ImageStore for &T {
    fn get_image(&self, token: &str) -> impl Future<Output = Result<Image, ImageError>> + Send {
        (**self).get_image(token)
    }
}

/// Store used when image capture is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableImageStore;

impl ImageStore for UnavailableImageStore {
    async fn get_image(&self, _token: &str) -> Result<Image, ImageError> {
        Err(ImageError::Unavailable)
    }
}

/// Store reading `<token>.png` files from a directory.
///
/// When a base URL is configured, each image also gets a public URL formed
/// by joining the file name onto it.
#[derive(Debug, Clone)]
pub struct DirImageStore {
    dir: PathBuf,
    base_url: Option<String>,
}

impl DirImageStore {
    /// File extension of stored images.
    pub const EXTENSION: &'static str = "png";

    /// Creates a store over `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            base_url: None,
        }
    }

    /// Sets the URL prefix under which the directory is served.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Returns the image directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(token: &str) -> Option<String> {
        let valid = !token.is_empty()
            && token != "."
            && token != ".."
            && !token.contains(['/', '\\']);
        valid.then(|| format!("{token}.{}", Self::EXTENSION))
    }
}

impl ImageStore for DirImageStore {
    async fn get_image(&self, token: &str) -> Result<Image, ImageError> {
        // Tokens that would escape the directory cannot name a stored image.
        let file_name = Self::file_name(token).ok_or(ImageError::NotFound)?;
        let path = self.dir.join(&file_name);

        let file = open_image(&path).await?;
        let created_at = file
            .metadata()
            .await
            .ok()
            .and_then(|meta| meta.modified().ok())
            .map(DateTime::<Utc>::from);

        let mut image = Image::new(token).with_path(path);
        image.created_at = created_at;
        if let Some(base) = &self.base_url {
            image.url = Some(join_url_path(base, &file_name));
        }

        Ok(image)
    }
}

/// Opens a stored image file for reading.
///
/// The path comes from image storage rather than user input and is only
/// normalised lexically.
///
/// # Errors
///
/// Returns [`ImageError::NotFound`] if the file does not exist or cannot be
/// accessed, and [`ImageError::Io`] for other failures.
pub async fn open_image(path: &Path) -> Result<tokio::fs::File, ImageError> {
    let path: PathBuf = path.components().collect();

    tokio::fs::File::open(&path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound | ErrorKind::PermissionDenied => ImageError::NotFound,
        _ => ImageError::Io { path, source: e },
    })
}
