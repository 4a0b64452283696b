//! Decoded image with its source location.

use image::RgbImage;

/// Basic image information extracted during loading.
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Path or URI the image came from.
    pub path: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Decoded RGB pixels.
    pub image: RgbImage,
}

impl ImageInfo {
    /// Wraps a decoded buffer, reading dimensions from it.
    #[must_use]
    pub fn new(path: impl Into<String>, image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            path: path.into(),
            width,
            height,
            image,
        }
    }
}
