//! Port definitions for hexagonal architecture.
//!
//! The engine reaches images, face detection, progress reporting and result
//! sinks only through these traits; adapters and the CLI provide them.

mod face_detector;
mod image_source;
mod progress;
mod result_output;

pub use face_detector::{FaceDetector, LazyFaceDetector, NoFaceDetector};
pub use image_source::{ImageSource, LoadFailure};
pub use progress::{ProgressEvent, ProgressSink};
pub use result_output::ResultOutput;
