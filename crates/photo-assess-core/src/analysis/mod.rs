//! Objective quality metrics.
//!
//! The [`Analyzer`] decodes an image once and derives every metric from the
//! same buffer: brightness, contrast, sharpness, rule-of-thirds adherence,
//! per-channel color balance and the number of detected faces.

mod color;
mod composition;
mod glyphs;
mod grayscale;
mod histogram;
mod sharpness;
mod visualize;

use std::fmt;
use std::sync::Arc;

use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use color::color_balance;
pub use composition::{detect_edges, rule_of_thirds_score, thirds_points};
pub use grayscale::{luma_of, to_gray};
pub use histogram::Histogram;
pub use sharpness::{laplacian_variance, DEFAULT_BLURRY_THRESHOLD, DEFAULT_SHARP_THRESHOLD};

use crate::domain::{AnalysisResult, BoundingBox, ImageDimensions};
use crate::error::{EngineError, Result};
use crate::ports::{FaceDetector, NoFaceDetector};

/// Tunable parameters of the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Canny low hysteresis threshold.
    pub canny_low: f32,
    /// Canny high hysteresis threshold.
    pub canny_high: f32,
    /// Thirds regions have half-side `min(w, h) / region_divisor`.
    pub region_divisor: u32,
    /// Sharpness below this is rated blurry.
    pub blurry_threshold: f64,
    /// Sharpness above this is rated sharp.
    pub sharp_threshold: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            canny_low: 100.0,
            canny_high: 200.0,
            region_divisor: 10,
            blurry_threshold: DEFAULT_BLURRY_THRESHOLD,
            sharp_threshold: DEFAULT_SHARP_THRESHOLD,
        }
    }
}

/// Decodes JPEG or PNG bytes into an RGB buffer.
///
/// # Errors
///
/// Returns [`EngineError::Decode`] for unparseable bytes and
/// [`EngineError::EmptyImage`] when either dimension is zero.
pub fn decode(bytes: &[u8]) -> Result<RgbImage> {
    let image = image::load_from_memory(bytes)?.to_rgb8();
    let (width, height) = image.dimensions();
    if ImageDimensions::new(width, height).is_empty() {
        return Err(EngineError::EmptyImage { width, height });
    }
    Ok(image)
}

/// Computes [`AnalysisResult`]s and annotated visualizations.
#[derive(Clone)]
pub struct Analyzer {
    config: AnalyzerConfig,
    detector: Arc<dyn FaceDetector>,
}

impl Analyzer {
    /// Creates an analyzer backed by the given face detector.
    #[must_use]
    pub fn new(config: AnalyzerConfig, detector: Arc<dyn FaceDetector>) -> Self {
        Self { config, detector }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyzes a decoded image.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyImage`] for a zero-area image and
    /// [`EngineError::FaceDetection`] when the detector fails.
    #[allow(clippy::cast_precision_loss)]
    pub fn analyze(&self, image: &RgbImage) -> Result<AnalysisResult> {
        let (width, height) = image.dimensions();
        let dimensions = ImageDimensions::new(width, height);
        if dimensions.is_empty() {
            return Err(EngineError::EmptyImage { width, height });
        }

        let gray = to_gray(image);
        let balance = color_balance(image);
        let brightness = balance.mean_intensity();
        let contrast = Histogram::from_luma(&gray).std_dev() / 255.0;
        let sharpness = laplacian_variance(&gray);
        // Frames too small for a thirds region score 0 without edge detection.
        let rule_of_thirds = if width.min(height) < self.config.region_divisor.max(1) {
            0.0
        } else {
            let edges = detect_edges(&gray, self.config.canny_low, self.config.canny_high);
            rule_of_thirds_score(&edges, self.config.region_divisor)
        };
        let face_count = self.detect_faces(&gray)?.len();

        debug!(
            width,
            height,
            brightness,
            contrast,
            sharpness,
            rule_of_thirds,
            face_count,
            "Analysis complete"
        );

        Ok(AnalysisResult {
            dimensions,
            aspect_ratio: f64::from(width) / f64::from(height),
            brightness,
            contrast: contrast.clamp(0.0, 1.0),
            rule_of_thirds,
            sharpness,
            color_balance: balance,
            face_count,
        })
    }

    /// Decodes and analyzes raw image bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Decode`] or [`EngineError::EmptyImage`] for bad
    /// input, or any error from [`Self::analyze`].
    pub fn analyze_bytes(&self, bytes: &[u8]) -> Result<AnalysisResult> {
        let image = decode(bytes)?;
        self.analyze(&image)
    }

    /// Draws the thirds grid, intersections, face boxes and the brightness,
    /// contrast and sharpness values onto a copy of `image`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::FaceDetection`] when the detector fails.
    pub fn render_visualization(
        &self,
        image: &RgbImage,
        result: &AnalysisResult,
    ) -> Result<RgbImage> {
        let faces = self.detect_faces(&to_gray(image))?;
        Ok(visualize::render(image, result, &faces))
    }

    /// Decodes raw bytes and renders their visualization.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Decode`] for unparseable bytes, or any error
    /// from [`Self::render_visualization`].
    pub fn render_visualization_bytes(
        &self,
        bytes: &[u8],
        result: &AnalysisResult,
    ) -> Result<RgbImage> {
        let image = decode(bytes)?;
        self.render_visualization(&image, result)
    }

    fn detect_faces(&self, gray: &GrayImage) -> Result<Vec<BoundingBox>> {
        self.detector
            .detect(gray)
            .map_err(|e| EngineError::FaceDetection(format!("{}: {e:#}", self.detector.name())))
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default(), Arc::new(NoFaceDetector))
    }
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analyzer")
            .field("config", &self.config)
            .field("detector", &self.detector.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};
    use std::io::Cursor;

    struct FixedDetector(Vec<BoundingBox>);

    impl FaceDetector for FixedDetector {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn detect(&self, _gray: &GrayImage) -> anyhow::Result<Vec<BoundingBox>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenDetector;

    impl FaceDetector for BrokenDetector {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn detect(&self, _gray: &GrayImage) -> anyhow::Result<Vec<BoundingBox>> {
            anyhow::bail!("model missing")
        }
    }

    fn gray_image(value: u8) -> RgbImage {
        RgbImage::from_pixel(300, 300, Rgb([value, value, value]))
    }

    #[allow(clippy::expect_used)]
    fn png_bytes(image: &RgbImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("encode png");
        bytes
    }

    #[test]
    fn test_default_config() {
        let config = AnalyzerConfig::default();
        assert!((config.canny_low - 100.0).abs() < f32::EPSILON);
        assert!((config.canny_high - 200.0).abs() < f32::EPSILON);
        assert_eq!(config.region_divisor, 10);
        assert!((config.blurry_threshold - 100.0).abs() < f64::EPSILON);
        assert!((config.sharp_threshold - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_solid_gray_metrics() {
        let result = Analyzer::default().analyze(&gray_image(128)).unwrap();
        assert_eq!(result.dimensions, ImageDimensions::new(300, 300));
        assert!((result.aspect_ratio - 1.0).abs() < f64::EPSILON);
        assert!((result.brightness - 128.0).abs() < 1e-9);
        assert!(result.contrast.abs() < 1e-9);
        assert!(result.sharpness.abs() < 1e-9);
        assert!(result.rule_of_thirds.abs() < f64::EPSILON);
        assert_eq!(result.face_count, 0);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_half_black_half_white_contrast() {
        let image = RgbImage::from_fn(100, 100, |x, _| {
            if x < 50 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        let result = Analyzer::default().analyze(&image).unwrap();
        assert!((result.contrast - 0.5).abs() < 1e-9);
        assert!((result.brightness - 127.5).abs() < 1e-9);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_faces_are_counted() {
        let detector = FixedDetector(vec![
            BoundingBox::new(10, 10, 20, 20),
            BoundingBox::new(50, 50, 20, 20),
        ]);
        let analyzer = Analyzer::new(AnalyzerConfig::default(), Arc::new(detector));
        let result = analyzer.analyze(&gray_image(90)).unwrap();
        assert_eq!(result.face_count, 2);
    }

    #[test]
    fn test_detector_failure_fails_analysis() {
        let analyzer = Analyzer::new(AnalyzerConfig::default(), Arc::new(BrokenDetector));
        let err = analyzer.analyze(&gray_image(90)).unwrap_err();
        assert!(matches!(err, EngineError::FaceDetection(ref msg) if msg.contains("model missing")));
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let err = Analyzer::default().analyze(&RgbImage::new(0, 10)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::EmptyImage {
                width: 0,
                height: 10
            }
        ));
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let err = Analyzer::default().analyze_bytes(b"not an image").unwrap_err();
        assert!(matches!(err, EngineError::Decode(_)));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_analyze_bytes_matches_analyze() {
        let image = RgbImage::from_fn(64, 48, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            Rgb([(x * 4) as u8, (y * 5) as u8, 80])
        });
        let analyzer = Analyzer::default();
        let direct = analyzer.analyze(&image).unwrap();
        let decoded = analyzer.analyze_bytes(&png_bytes(&image)).unwrap();
        assert_eq!(direct, decoded);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_visualization_keeps_dimensions() {
        let image = gray_image(60);
        let analyzer = Analyzer::default();
        let result = analyzer.analyze(&image).unwrap();
        let viz = analyzer.render_visualization(&image, &result).unwrap();
        assert_eq!(viz.dimensions(), image.dimensions());
        assert_ne!(viz, image);
    }

    #[test]
    fn test_visualization_bytes_rejects_garbage() {
        let analyzer = Analyzer::default();
        let result = AnalysisResult {
            dimensions: ImageDimensions::new(1, 1),
            aspect_ratio: 1.0,
            brightness: 0.0,
            contrast: 0.0,
            rule_of_thirds: 0.0,
            sharpness: 0.0,
            color_balance: color_balance(&RgbImage::new(1, 1)),
            face_count: 0,
        };
        let err = analyzer
            .render_visualization_bytes(&[0xFF, 0xD8, 0x00], &result)
            .unwrap_err();
        assert!(matches!(err, EngineError::Decode(_)));
    }
}
