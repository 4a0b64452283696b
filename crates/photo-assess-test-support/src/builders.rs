//! Synthetic image builders for testing.

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use image::{ImageFormat, Rgb, RgbImage};
use photo_assess_core::analysis::color_balance;
use photo_assess_core::domain::{AnalysisResult, ImageDimensions, ImageInfo};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Builder for creating synthetic test images.
///
/// Provides convenience methods for generating images with specific
/// characteristics (sharp, flat, dark, color-cast, off-center subject...).
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    // === Sharp/High-Contrast Images ===

    /// Creates a high-contrast checkerboard pattern (very sharp edges).
    #[must_use]
    pub fn checkerboard(width: u32, height: u32) -> ImageInfo {
        Self::checkerboard_with_cell_size(width, height, 8)
    }

    /// Creates a checkerboard with custom cell size.
    #[must_use]
    pub fn checkerboard_with_cell_size(width: u32, height: u32, cell_size: u32) -> ImageInfo {
        let cell = cell_size.max(1);
        let img = RgbImage::from_fn(width, height, |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                WHITE
            } else {
                BLACK
            }
        });
        ImageInfo::new("synthetic://checkerboard", img)
    }

    // === Flat/Blurry Images ===

    /// Creates a uniform gray image (no edges, zero sharpness).
    #[must_use]
    pub fn uniform_gray(width: u32, height: u32, value: u8) -> ImageInfo {
        let img = RgbImage::from_pixel(width, height, Rgb([value, value, value]));
        ImageInfo::new("synthetic://uniform_gray", img)
    }

    /// Creates a completely black image.
    #[must_use]
    pub fn black(width: u32, height: u32) -> ImageInfo {
        Self::uniform_gray(width, height, 0)
    }

    /// Creates a smooth horizontal gradient (low Laplacian variance).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn horizontal_gradient(width: u32, height: u32) -> ImageInfo {
        let img = RgbImage::from_fn(width, height, |x, _| {
            let val = ((u32::from(u8::MAX) * x) / width.max(1)) as u8;
            Rgb([val, val, val])
        });
        ImageInfo::new("synthetic://horizontal_gradient", img)
    }

    // === Color Images ===

    /// Creates a uniform RGB image.
    #[must_use]
    pub fn rgb_uniform(width: u32, height: u32, r: u8, g: u8, b: u8) -> ImageInfo {
        let img = RgbImage::from_pixel(width, height, Rgb([r, g, b]));
        ImageInfo::new("synthetic://rgb_uniform", img)
    }

    /// Creates a varied image with a warm color cast.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn warm_scene(width: u32, height: u32) -> ImageInfo {
        let img = RgbImage::from_fn(width, height, |x, y| {
            let base = ((x * 3 + y * 5) % 120) as u8;
            Rgb([base + 120, base + 60, base / 2])
        });
        ImageInfo::new("synthetic://warm_scene", img)
    }

    // === Composition Images ===

    /// Creates a black frame with a white square subject.
    ///
    /// Useful for testing the crop solver and rule-of-thirds scoring.
    #[must_use]
    pub fn subject_at(width: u32, height: u32, x: u32, y: u32, side: u32) -> ImageInfo {
        let img = RgbImage::from_fn(width, height, |px, py| {
            if (x..x.saturating_add(side)).contains(&px) && (y..y.saturating_add(side)).contains(&py)
            {
                WHITE
            } else {
                BLACK
            }
        });
        ImageInfo::new("synthetic://subject", img)
    }

    /// Creates a frame with small high-contrast blobs on the four thirds
    /// intersections.
    #[must_use]
    pub fn thirds_subjects(width: u32, height: u32) -> ImageInfo {
        let (w3, h3) = (width / 3, height / 3);
        let radius = (width.min(height) / 20).max(1);
        let points = [(w3, h3), (w3 * 2, h3), (w3, h3 * 2), (w3 * 2, h3 * 2)];
        let img = RgbImage::from_fn(width, height, |x, y| {
            let near = points
                .iter()
                .any(|&(px, py)| x.abs_diff(px) <= radius && y.abs_diff(py) <= radius);
            if near {
                WHITE
            } else {
                BLACK
            }
        });
        ImageInfo::new("synthetic://thirds_subjects", img)
    }

    // === Special Test Images ===

    /// Creates a 1x1 pixel image (edge case).
    #[must_use]
    pub fn single_pixel(value: u8) -> ImageInfo {
        Self::uniform_gray(1, 1, value)
    }
}

/// Convenience functions for common test images.
impl SyntheticImageBuilder {
    /// Returns a standard sharp test image (128x128 checkerboard).
    #[must_use]
    pub fn sharp_image() -> ImageInfo {
        Self::checkerboard(128, 128)
    }

    /// Returns a standard blurry test image (128x128 uniform gray).
    #[must_use]
    pub fn blurry_image() -> ImageInfo {
        Self::uniform_gray(128, 128, 128)
    }
}

/// Encodes an image as PNG bytes.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .context("Failed to encode PNG")?;
    Ok(bytes)
}

/// Writes an image to `path`, format chosen by extension.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_png(image: &RgbImage, path: &Path) -> Result<()> {
    image
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Builds an analysis of a neutral 300x300 frame with the given metrics.
#[must_use]
pub fn sample_analysis(brightness: f64, contrast: f64, rule_of_thirds: f64) -> AnalysisResult {
    AnalysisResult {
        dimensions: ImageDimensions::new(300, 300),
        aspect_ratio: 1.0,
        brightness,
        contrast,
        rule_of_thirds,
        sharpness: 0.0,
        color_balance: color_balance(&RgbImage::new(1, 1)),
        face_count: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkerboard_dimensions() {
        let img = SyntheticImageBuilder::checkerboard(100, 80);
        assert_eq!(img.width, 100);
        assert_eq!(img.height, 80);
        assert_eq!(img.path, "synthetic://checkerboard");
    }

    #[test]
    fn test_checkerboard_pattern() {
        let img = SyntheticImageBuilder::checkerboard_with_cell_size(16, 16, 8);
        assert_eq!(*img.image.get_pixel(0, 0), WHITE);
        assert_eq!(*img.image.get_pixel(8, 0), BLACK);
    }

    #[test]
    fn test_uniform_gray() {
        let img = SyntheticImageBuilder::uniform_gray(50, 50, 100);
        assert!(img.image.pixels().all(|p| p.0 == [100, 100, 100]));
    }

    #[test]
    fn test_gradient_range() {
        let img = SyntheticImageBuilder::horizontal_gradient(256, 10);
        assert!(img.image.get_pixel(0, 0).0[0] < 5);
        assert!(img.image.get_pixel(255, 0).0[0] > 250);
    }

    #[test]
    fn test_subject_at() {
        let img = SyntheticImageBuilder::subject_at(100, 100, 10, 20, 5);
        assert_eq!(*img.image.get_pixel(12, 22), WHITE);
        assert_eq!(*img.image.get_pixel(15, 22), BLACK);
        assert_eq!(*img.image.get_pixel(0, 0), BLACK);
    }

    #[test]
    fn test_thirds_subjects_mark_intersections() {
        let img = SyntheticImageBuilder::thirds_subjects(300, 300);
        assert_eq!(*img.image.get_pixel(100, 100), WHITE);
        assert_eq!(*img.image.get_pixel(200, 200), WHITE);
        assert_eq!(*img.image.get_pixel(150, 150), BLACK);
    }

    #[test]
    fn test_warm_scene_is_red_heavy() {
        let img = SyntheticImageBuilder::warm_scene(32, 32);
        assert!(img.image.pixels().all(|p| p.0[0] > p.0[2]));
    }

    #[test]
    fn test_png_bytes_decode() {
        let img = SyntheticImageBuilder::checkerboard(16, 16);
        let bytes = encode_png(&img.image).unwrap_or_default();
        let decoded = image::load_from_memory(&bytes).map(|d| d.to_rgb8()).ok();
        assert_eq!(decoded, Some(img.image));
    }

    #[test]
    fn test_sample_analysis() {
        let analysis = sample_analysis(128.0, 0.5, 0.2);
        assert_eq!(analysis.dimensions, ImageDimensions::new(300, 300));
        assert!((analysis.rule_of_thirds - 0.2).abs() < f64::EPSILON);
    }
}
