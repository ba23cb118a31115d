//! Upload handling: MIME detection and transient staging of images.

pub mod mime_detect;
pub mod staging;

pub use mime_detect::{detect_image_format, mime_from_extension, resolve_image_mime};
pub use staging::{staging_path, StagedImage, StagingArea, STAGING_PREFIX};
