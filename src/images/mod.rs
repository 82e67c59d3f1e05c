//! Image attachment layer.
//!
//! This module provides:
//! - Stored image metadata ([`Image`])
//! - The image store abstraction ([`ImageStore`]) and two implementations
//!   ([`DirImageStore`], [`UnavailableImageStore`])
//! - Per-alert image resolution ([`resolve_image`])
//! - Batch attachment with early stop ([`with_stored_images`])

mod error;
mod resolve;
mod store;


pub use error::{AttachError, ImageError};
pub use resolve::{IMAGE_STORE_TIMEOUT, Resolution, Visit, resolve_image, with_stored_images};
pub use store::{DirImageStore, Image, ImageStore, UnavailableImageStore, open_image};
