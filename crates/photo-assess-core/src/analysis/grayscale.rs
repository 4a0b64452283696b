//! Luma conversion.

use image::{GrayImage, Luma, RgbImage};

/// ITU-R BT.601 luma of one pixel, rounded to the nearest integer.
#[inline]
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn luma_of(rgb: [u8; 3]) -> u8 {
    let [r, g, b] = rgb.map(u32::from);
    // Max is (255 * 1000 + 500) / 1000 = 255
    ((r * 299 + g * 587 + b * 114 + 500) / 1000) as u8
}

/// Converts an RGB buffer to grayscale with BT.601 weights.
#[must_use]
pub fn to_gray(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([luma_of(image.get_pixel(x, y).0)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma_extremes() {
        assert_eq!(luma_of([0, 0, 0]), 0);
        assert_eq!(luma_of([255, 255, 255]), 255);
        assert_eq!(luma_of([128, 128, 128]), 128);
    }

    #[test]
    fn test_luma_weights() {
        // 0.299 * 255 = 76.2, 0.587 * 255 = 149.7, 0.114 * 255 = 29.1
        assert_eq!(luma_of([255, 0, 0]), 76);
        assert_eq!(luma_of([0, 255, 0]), 150);
        assert_eq!(luma_of([0, 0, 255]), 29);
    }

    #[test]
    fn test_to_gray_dimensions() {
        let gray = to_gray(&RgbImage::new(7, 3));
        assert_eq!(gray.dimensions(), (7, 3));
    }
}
