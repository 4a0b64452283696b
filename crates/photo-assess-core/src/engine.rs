//! One-call analysis and enhancement over raw image bytes.

use image::RgbImage;
use tracing::info;

use crate::analysis::{decode, Analyzer};
use crate::domain::{AdjustmentVector, AnalysisResult};
use crate::enhance::Enhancer;
use crate::error::Result;

/// Output of [`PhotoEngine::enhance_bytes`].
#[derive(Debug, Clone)]
pub struct Enhancement {
    /// The corrected image.
    pub image: RgbImage,
    /// Metrics of the input image.
    pub analysis: AnalysisResult,
    /// The adjustments that were applied.
    pub adjustments: AdjustmentVector,
}

/// Bundles an [`Analyzer`] and an [`Enhancer`].
///
/// Holds no mutable state; a single engine can serve concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct PhotoEngine {
    analyzer: Analyzer,
    enhancer: Enhancer,
}

impl PhotoEngine {
    /// Creates an engine from its two stages.
    #[must_use]
    pub const fn new(analyzer: Analyzer, enhancer: Enhancer) -> Self {
        Self { analyzer, enhancer }
    }

    /// Returns the analyzer.
    #[must_use]
    pub const fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Returns the enhancer.
    #[must_use]
    pub const fn enhancer(&self) -> &Enhancer {
        &self.enhancer
    }

    /// Decodes and analyzes raw image bytes.
    ///
    /// # Errors
    ///
    /// See [`Analyzer::analyze_bytes`].
    pub fn analyze_bytes(&self, bytes: &[u8]) -> Result<AnalysisResult> {
        self.analyzer.analyze_bytes(bytes)
    }

    /// Decodes, analyzes, derives adjustments from `suggestions` and applies
    /// them.
    ///
    /// # Errors
    ///
    /// Returns a decode, empty-image or face-detection error from the
    /// analysis, or a geometry error from the transforms.
    pub fn enhance_bytes<S: AsRef<str>>(&self, bytes: &[u8], suggestions: &[S]) -> Result<Enhancement> {
        let image = decode(bytes)?;
        let analysis = self.analyzer.analyze(&image)?;
        let (image, adjustments) = self.enhancer.enhance(image, suggestions, &analysis)?;
        info!(
            width = image.width(),
            height = image.height(),
            identity = adjustments.is_identity(),
            "Enhanced image"
        );
        Ok(Enhancement {
            image,
            analysis,
            adjustments,
        })
    }
}
