//! Engine error type.

use thiserror::Error;

/// Errors raised by the analysis and enhancement engine.
///
/// All failures are synchronous and fatal for the call that produced them;
/// the engine never retries.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The input bytes are not a supported or intact raster image.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// The decoded image has no pixels.
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage {
        /// Decoded width.
        width: u32,
        /// Decoded height.
        height: u32,
    },

    /// A transform was requested on a zero-area image.
    #[error("cannot transform a zero-area image ({width}x{height})")]
    InvalidGeometry {
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },

    /// The configured face detector failed to load or run.
    #[error("face detection failed: {0}")]
    FaceDetection(String),
}

/// Convenience alias for engine results.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;
