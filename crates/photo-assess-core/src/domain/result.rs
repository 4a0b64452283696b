//! Analysis result types.

use serde::{Deserialize, Serialize};

use crate::analysis::AnalyzerConfig;

/// Objective quality metrics computed once per decoded image.
///
/// Every field is derived from the same decoded buffer. The value is never
/// partially populated: analysis either succeeds fully or fails.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Image dimensions.
    pub dimensions: ImageDimensions,
    /// Width divided by height.
    pub aspect_ratio: f64,
    /// Mean of the per-channel means, 0-255.
    pub brightness: f64,
    /// Grayscale standard deviation divided by 255, 0-1.
    pub contrast: f64,
    /// Edge concentration around the thirds intersections, 0-1.
    pub rule_of_thirds: f64,
    /// Variance of the Laplacian response. Unbounded above.
    pub sharpness: f64,
    /// Per-channel histogram statistics.
    pub color_balance: ColorBalance,
    /// Number of detected frontal faces.
    pub face_count: usize,
}

impl AnalysisResult {
    /// Classifies the sharpness metric against the configured thresholds.
    #[must_use]
    pub fn sharpness_level(&self, config: &AnalyzerConfig) -> SharpnessLevel {
        SharpnessLevel::classify(self.sharpness, config.blurry_threshold, config.sharp_threshold)
    }

    /// Renders the metrics as the plain-text context block handed to
    /// prompt-construction collaborators.
    #[must_use]
    pub fn summary(&self) -> String {
        let balance = &self.color_balance;
        [
            "Image Analysis:".to_string(),
            format!(
                "- Dimensions: {}x{}",
                self.dimensions.width, self.dimensions.height
            ),
            format!("- Aspect Ratio: {:.2}", self.aspect_ratio),
            format!(
                "- Brightness: {:.2} (0-255 scale, ideal range 80-180)",
                self.brightness
            ),
            format!(
                "- Contrast: {:.2} (0-1 scale, ideal range 0.4-0.7)",
                self.contrast
            ),
            format!(
                "- Rule of Thirds Adherence: {:.2} (0-1 scale, higher is better)",
                self.rule_of_thirds
            ),
            format!("- Sharpness: {:.2} (higher is sharper)", self.sharpness),
            format!(
                "- Color Balance (RGB): R={:.2}, G={:.2}, B={:.2} (ideal is close to 1.0 for each)",
                balance.red.balance, balance.green.balance, balance.blue.balance
            ),
            format!("- Faces Detected: {}\n", self.face_count),
        ]
        .join("\n")
    }
}

/// Image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageDimensions {
    /// Creates new image dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true when either side is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Histogram statistics of one color channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    /// Weighted mean intensity, 0-255.
    pub average: f64,
    /// Channel average divided by the mean of all channel averages.
    pub balance: f64,
    /// Weighted intensity variance.
    pub variance: f64,
}

/// Color balance across the red, green and blue channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorBalance {
    /// Red channel.
    pub red: ChannelStats,
    /// Green channel.
    pub green: ChannelStats,
    /// Blue channel.
    pub blue: ChannelStats,
}

/// Axis-aligned box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// X coordinate of the top-left corner.
    pub x: u32,
    /// Y coordinate of the top-left corner.
    pub y: u32,
    /// Box width.
    pub width: u32,
    /// Box height.
    pub height: u32,
}

impl BoundingBox {
    /// Creates a new bounding box.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center point, rounded down.
    #[must_use]
    pub const fn center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// Coarse sharpness rating.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharpnessLevel {
    /// Laplacian variance below the blurry threshold.
    Blurry,
    /// Between the two thresholds.
    Acceptable,
    /// Laplacian variance above the sharp threshold.
    Sharp,
}

impl SharpnessLevel {
    /// Classifies a Laplacian variance.
    #[must_use]
    pub fn classify(sharpness: f64, blurry_threshold: f64, sharp_threshold: f64) -> Self {
        if sharpness < blurry_threshold {
            Self::Blurry
        } else if sharpness > sharp_threshold {
            Self::Sharp
        } else {
            Self::Acceptable
        }
    }
}
