//! Adjustment vector derived from suggestions.

use serde::{Deserialize, Serialize};

/// Bounded set of deltas describing how to transform an image.
///
/// Built fresh for every enhancement request and consumed immediately by
/// the transform stage. The default value is the zero vector, a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentVector {
    /// Brightness delta, in `[-0.5, -0.1] ∪ {0} ∪ [0.1, 0.5]`.
    pub brightness_delta: f64,
    /// Contrast delta, in `[-0.3, -0.1] ∪ {0} ∪ [0.1, 0.7]`.
    pub contrast_delta: f64,
    /// Saturation delta.
    pub color_delta: f64,
    /// Sharpness delta.
    pub sharpness_delta: f64,
    /// Color temperature delta; positive is warmer.
    pub warmth_delta: f64,
    /// Whether to apply the rule-of-thirds crop.
    pub crop_for_rule_of_thirds: bool,
}

impl AdjustmentVector {
    /// Returns true when applying this vector leaves an image untouched.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_identity(&self) -> bool {
        !self.crop_for_rule_of_thirds
            && self.brightness_delta == 0.0
            && self.contrast_delta == 0.0
            && self.color_delta == 0.0
            && self.sharpness_delta == 0.0
            && self.warmth_delta == 0.0
    }
}
