//! Frontal face detection port.
//!
//! The engine only counts and draws faces; how they are found is left to
//! whichever detector is plugged in (classical cascade, learned model, ...).

use std::fmt;
use std::sync::OnceLock;

use image::GrayImage;
use tracing::debug;

use crate::domain::BoundingBox;

/// Pluggable frontal face detector.
///
/// Implementations must be safe to call concurrently; any loaded model data
/// is expected to be read-only after construction.
pub trait FaceDetector: Send + Sync {
    /// Returns the name of this detector.
    fn name(&self) -> &'static str;

    /// Detects faces in a grayscale image.
    ///
    /// # Errors
    ///
    /// Returns an error if the detector cannot run.
    fn detect(&self, gray: &GrayImage) -> anyhow::Result<Vec<BoundingBox>>;
}

/// Detector that never finds a face. Used when none is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFaceDetector;

impl FaceDetector for NoFaceDetector {
    fn name(&self) -> &'static str {
        "none"
    }

    fn detect(&self, _gray: &GrayImage) -> anyhow::Result<Vec<BoundingBox>> {
        Ok(Vec::new())
    }
}

type DetectorLoader = Box<dyn Fn() -> anyhow::Result<Box<dyn FaceDetector>> + Send + Sync>;

/// Defers construction of a detector until its first use.
///
/// The loader runs at most once, even under concurrent first calls; later
/// calls share the loaded detector without locking. A failed load is cached
/// and reported on every call.
pub struct LazyFaceDetector {
    name: &'static str,
    loader: DetectorLoader,
    detector: OnceLock<Result<Box<dyn FaceDetector>, String>>,
}

impl LazyFaceDetector {
    /// Creates a lazy detector from a loader closure.
    pub fn new<F>(name: &'static str, loader: F) -> Self
    where
        F: Fn() -> anyhow::Result<Box<dyn FaceDetector>> + Send + Sync + 'static,
    {
        Self {
            name,
            loader: Box::new(loader),
            detector: OnceLock::new(),
        }
    }

    /// Returns true once the loader has run, successfully or not.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.detector.get().is_some()
    }

    /// Loads or returns the cached detector.
    fn get(&self) -> anyhow::Result<&dyn FaceDetector> {
        let loaded = self.detector.get_or_init(|| {
            debug!("Loading face detector {}", self.name);
            (self.loader)().map_err(|e| format!("{e:#}"))
        });

        loaded
            .as_ref()
            .map(|detector| &**detector)
            .map_err(|e| anyhow::anyhow!("{e}"))
    }
}

impl fmt::Debug for LazyFaceDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyFaceDetector")
            .field("name", &self.name)
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

impl FaceDetector for LazyFaceDetector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn detect(&self, gray: &GrayImage) -> anyhow::Result<Vec<BoundingBox>> {
        self.get()?.detect(gray)
    }
}
