//! Suggestion-driven enhancement.
//!
//! The [`Enhancer`] turns free-text suggestions plus the current metrics into
//! an [`AdjustmentVector`] and applies it in a fixed order: crop, brightness,
//! contrast, color, sharpness, warmth.

mod crop;
mod suggestions;
mod transforms;

use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use crop::{solve_crop, CropParams, CropWindow, MIN_KEEP_FRACTION};

use crate::domain::{AdjustmentVector, AnalysisResult, ImageDimensions};
use crate::error::{EngineError, Result};

/// Tunable parameters of the enhancer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancerConfig {
    /// Crop only when the rule-of-thirds score is below this.
    pub crop_threshold: f64,
    /// Fraction of each dimension the crop keeps. Values below
    /// [`MIN_KEEP_FRACTION`] are raised to it.
    pub crop_keep_fraction: f64,
    /// Canny low threshold for subject detection.
    pub canny_low: f32,
    /// Canny high threshold for subject detection.
    pub canny_high: f32,
    /// Lower bound of a brightness increase.
    pub brightness_increase_min: f64,
    /// Upper bound of a brightness increase.
    pub brightness_increase_max: f64,
    /// Lower bound of a brightness decrease.
    pub brightness_decrease_min: f64,
    /// Upper bound of a brightness decrease.
    pub brightness_decrease_max: f64,
    /// Lower bound of a contrast increase.
    pub contrast_increase_min: f64,
    /// Upper bound of a contrast increase.
    pub contrast_increase_max: f64,
    /// Lower bound of a contrast decrease.
    pub contrast_decrease_min: f64,
    /// Upper bound of a contrast decrease.
    pub contrast_decrease_max: f64,
    /// Saturation delta for "more color".
    pub color_increase: f64,
    /// Saturation delta for "less color".
    pub color_decrease: f64,
    /// Sharpness delta for "sharper".
    pub sharpness_increase: f64,
    /// Sharpness delta for "softer".
    pub sharpness_decrease: f64,
    /// Warmth delta for "warmer".
    pub warmth_increase: f64,
    /// Warmth delta for "cooler".
    pub warmth_decrease: f64,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            crop_threshold: 0.4,
            crop_keep_fraction: 0.8,
            canny_low: 100.0,
            canny_high: 200.0,
            brightness_increase_min: 0.1,
            brightness_increase_max: 0.5,
            brightness_decrease_min: -0.5,
            brightness_decrease_max: -0.1,
            contrast_increase_min: 0.1,
            contrast_increase_max: 0.7,
            contrast_decrease_min: -0.3,
            contrast_decrease_max: -0.1,
            color_increase: 0.3,
            color_decrease: -0.2,
            sharpness_increase: 0.5,
            sharpness_decrease: -0.2,
            warmth_increase: 0.2,
            warmth_decrease: -0.2,
        }
    }
}

impl EnhancerConfig {
    const fn crop_params(&self) -> CropParams {
        CropParams {
            canny_low: self.canny_low,
            canny_high: self.canny_high,
            keep_fraction: self.crop_keep_fraction,
        }
    }
}

/// Derives and applies adjustment vectors.
#[derive(Debug, Clone, Default)]
pub struct Enhancer {
    config: EnhancerConfig,
}

impl Enhancer {
    /// Creates an enhancer with the given configuration.
    #[must_use]
    pub const fn new(config: EnhancerConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &EnhancerConfig {
        &self.config
    }

    /// Maps suggestion text and current metrics to an adjustment vector.
    ///
    /// Never fails; unrecognized text contributes nothing.
    #[must_use]
    pub fn derive_adjustments<S: AsRef<str>>(
        &self,
        suggestions: &[S],
        analysis: &AnalysisResult,
    ) -> AdjustmentVector {
        let adjustments = suggestions::parse(suggestions, analysis, &self.config);
        debug!(?adjustments, count = suggestions.len(), "Derived adjustments");
        adjustments
    }

    /// Applies `adjustments` to `image`, consuming it.
    ///
    /// Zero deltas are skipped entirely, so the zero vector returns the input
    /// unchanged. When no subject contour is found the crop is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidGeometry`] for a zero-area image.
    #[allow(clippy::float_cmp)]
    pub fn apply(
        &self,
        image: RgbImage,
        adjustments: &AdjustmentVector,
        analysis: &AnalysisResult,
    ) -> Result<RgbImage> {
        let (width, height) = image.dimensions();
        let dimensions = ImageDimensions::new(width, height);
        if dimensions.is_empty() {
            return Err(EngineError::InvalidGeometry { width, height });
        }
        if analysis.dimensions != dimensions {
            warn!(
                image_width = width,
                image_height = height,
                analysis_width = analysis.dimensions.width,
                analysis_height = analysis.dimensions.height,
                "Analysis was computed on a different frame"
            );
        }

        let mut image = image;
        if adjustments.crop_for_rule_of_thirds {
            if let Some(window) = solve_crop(&image, &self.config.crop_params()) {
                debug!(?window, "Cropping");
                image = window.apply(&image);
            }
        }

        let steps: [(&str, f64, fn(&mut RgbImage, f64)); 4] = [
            ("brightness", adjustments.brightness_delta, transforms::brightness),
            ("contrast", adjustments.contrast_delta, transforms::contrast),
            ("color", adjustments.color_delta, transforms::color),
            ("sharpness", adjustments.sharpness_delta, transforms::sharpness),
        ];
        for (name, delta, transform) in steps {
            if delta != 0.0 {
                debug!(transform = name, factor = 1.0 + delta, "Applying");
                transform(&mut image, 1.0 + delta);
            }
        }

        if adjustments.warmth_delta != 0.0 {
            debug!(delta = adjustments.warmth_delta, "Applying warmth");
            transforms::warmth(&mut image, adjustments.warmth_delta);
        }

        Ok(image)
    }

    /// Derives adjustments from `suggestions` and applies them.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidGeometry`] for a zero-area image.
    pub fn enhance<S: AsRef<str>>(
        &self,
        image: RgbImage,
        suggestions: &[S],
        analysis: &AnalysisResult,
    ) -> Result<(RgbImage, AdjustmentVector)> {
        let adjustments = self.derive_adjustments(suggestions, analysis);
        let enhanced = self.apply(image, &adjustments, analysis)?;
        Ok((enhanced, adjustments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Analyzer, Histogram};
    use image::Rgb;

    fn checker(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            if (x / 7 + y / 5) % 2 == 0 {
                Rgb([200, 120, 40])
            } else {
                Rgb([30, 90, 160])
            }
        })
    }

    #[allow(clippy::unwrap_used)]
    fn analyze(image: &RgbImage) -> AnalysisResult {
        Analyzer::default().analyze(image).unwrap()
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_zero_vector_is_noop() {
        let image = checker(64, 48);
        let analysis = analyze(&image);
        let out = Enhancer::default()
            .apply(image.clone(), &AdjustmentVector::default(), &analysis)
            .unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn test_zero_area_is_rejected() {
        let image = checker(10, 10);
        let analysis = analyze(&image);
        let err = Enhancer::default()
            .apply(RgbImage::new(0, 0), &AdjustmentVector::default(), &analysis)
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidGeometry {
                width: 0,
                height: 0
            }
        ));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_increase_brightness_on_mid_gray() {
        let image = RgbImage::from_pixel(300, 300, Rgb([128, 128, 128]));
        let analysis = analyze(&image);
        let (out, adjustments) = Enhancer::default()
            .enhance(image, &["increase brightness"], &analysis)
            .unwrap();
        assert!((adjustments.brightness_delta - 0.498).abs() < 1e-3);
        let gray = crate::analysis::to_gray(&out);
        assert!(Histogram::from_luma(&gray).mean() > 128.0);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_crop_without_contours_keeps_frame() {
        let image = RgbImage::from_pixel(100, 80, Rgb([0, 0, 0]));
        let analysis = analyze(&image);
        let adjustments = AdjustmentVector {
            crop_for_rule_of_thirds: true,
            ..AdjustmentVector::default()
        };
        let out = Enhancer::default()
            .apply(image.clone(), &adjustments, &analysis)
            .unwrap();
        assert_eq!(out, image);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_crop_keeps_most_of_frame() {
        let image = RgbImage::from_fn(200, 100, |x, y| {
            if (150..180).contains(&x) && (60..90).contains(&y) {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        let analysis = analyze(&image);
        let adjustments = AdjustmentVector {
            crop_for_rule_of_thirds: true,
            ..AdjustmentVector::default()
        };
        let out = Enhancer::default().apply(image, &adjustments, &analysis).unwrap();
        assert_eq!(out.dimensions(), (160, 80));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_configured_keep_fraction_is_floored() {
        let image = RgbImage::from_fn(200, 100, |x, y| {
            if (150..180).contains(&x) && (60..90).contains(&y) {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        let analysis = analyze(&image);
        let adjustments = AdjustmentVector {
            crop_for_rule_of_thirds: true,
            ..AdjustmentVector::default()
        };
        let enhancer = Enhancer::new(EnhancerConfig {
            crop_keep_fraction: 0.3,
            ..EnhancerConfig::default()
        });
        let out = enhancer.apply(image, &adjustments, &analysis).unwrap();
        assert_eq!(out.dimensions(), (160, 80));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_warmth_runs_last() {
        // Brightness then warmth: 100 * 1.5 = 150, red 150 * 1.2 = 180
        let image = RgbImage::from_pixel(8, 8, Rgb([100, 100, 100]));
        let analysis = analyze(&image);
        let adjustments = AdjustmentVector {
            brightness_delta: 0.5,
            warmth_delta: 0.2,
            ..AdjustmentVector::default()
        };
        let out = Enhancer::default().apply(image, &adjustments, &analysis).unwrap();
        assert_eq!(out.get_pixel(0, 0).0, [180, 150, 135]);
    }
}
