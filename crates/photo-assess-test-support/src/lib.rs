//! Test support utilities for photo-assess.
//!
//! Provides mocks, synthetic image builders, and utilities for testing
//! the analysis and enhancement pipeline.
//!
//! # Example
//!
//! ```
//! use photo_assess_test_support::{MockFaceDetector, MockImageSource, SyntheticImageBuilder};
//!
//! // Create synthetic test images
//! let sharp = SyntheticImageBuilder::checkerboard(128, 128);
//! let flat = SyntheticImageBuilder::uniform_gray(128, 128, 128);
//!
//! // Create mock ports
//! let source = MockImageSource::new(vec![sharp, flat]);
//! let faces = MockFaceDetector::with_faces(2);
//! ```

mod builders;
mod mocks;

pub use builders::{encode_png, sample_analysis, write_png, SyntheticImageBuilder};
pub use mocks::{
    FailingFaceDetector, MockFaceDetector, MockImageSource, MockProgressSink, MockResultOutput,
};
