//! Photo Assess Core - Image quality analysis and enhancement engine
//!
//! This crate contains the domain types, port traits, the analyzer that
//! computes brightness, contrast, sharpness, rule-of-thirds and color-balance
//! metrics, and the enhancer that turns free-text suggestions into bounded
//! pixel transforms.

pub mod analysis;
pub mod domain;
pub mod engine;
pub mod enhance;
pub mod error;
pub mod ports;

pub use analysis::{decode, Analyzer, AnalyzerConfig};
pub use domain::{
    AdjustmentVector, AnalysisRecord, AnalysisResult, BoundingBox, ChannelStats, ColorBalance,
    ImageDimensions, ImageInfo, SharpnessLevel,
};
pub use engine::{Enhancement, PhotoEngine};
pub use enhance::{CropWindow, Enhancer, EnhancerConfig, MIN_KEEP_FRACTION};
pub use error::{EngineError, Result};
pub use ports::{
    FaceDetector, ImageSource, LazyFaceDetector, LoadFailure, NoFaceDetector, ProgressEvent,
    ProgressSink, ResultOutput,
};
