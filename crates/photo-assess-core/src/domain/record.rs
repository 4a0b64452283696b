//! Per-image record emitted by batch analysis.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{AnalysisResult, SharpnessLevel};

/// Analysis of a single image together with where and when it was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Path to the analyzed image.
    pub path: String,
    /// Timestamp of analysis (RFC 3339).
    pub timestamp: String,
    /// Sharpness rating under the active thresholds.
    pub sharpness_level: SharpnessLevel,
    /// The computed metrics.
    #[serde(flatten)]
    pub analysis: AnalysisResult,
    /// Optional EXIF metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exif: Option<HashMap<String, String>>,
}
