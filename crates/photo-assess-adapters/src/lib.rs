//! Photo Assess Adapters - External adapters for photo-assess.
//!
//! This crate provides adapters for:
//! - Filesystem image source
//! - Raster encoding of enhanced and annotated images
//! - EXIF metadata extraction

pub mod encode;
pub mod fs;
pub mod metadata;

pub use encode::{encode_image, save_image, write_image, OutputFormat, DEFAULT_JPEG_QUALITY};
pub use fs::{is_supported_image, load_image, read_bytes, FsImageSource};
pub use metadata::extract_exif;
