//! Mock implementations of core port traits.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use image::GrayImage;
use photo_assess_core::domain::{AnalysisRecord, BoundingBox, ImageInfo};
use photo_assess_core::ports::{
    FaceDetector, ImageSource, LoadFailure, ProgressEvent, ProgressSink, ResultOutput,
};

/// Mock implementation of `ImageSource` for testing.
///
/// Yields pre-built images, then any configured load failures.
pub struct MockImageSource {
    images: Vec<ImageInfo>,
    failures: Vec<LoadFailure>,
    iteration_count: Arc<Mutex<usize>>,
}

impl MockImageSource {
    /// Creates a new mock source with the given images.
    #[must_use]
    pub fn new(images: Vec<ImageInfo>) -> Self {
        Self {
            images,
            failures: Vec::new(),
            iteration_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Adds an entry that fails to load.
    #[must_use]
    pub fn with_failure(mut self, path: &str, reason: &str) -> Self {
        self.failures.push(LoadFailure {
            path: path.into(),
            reason: reason.into(),
        });
        self
    }

    /// Returns the number of times the source has been iterated.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ImageSource for MockImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = Result<ImageInfo, LoadFailure>> + Send + '_> {
        if let Ok(mut c) = self.iteration_count.lock() {
            *c += 1;
        }
        Box::new(
            self.images
                .iter()
                .cloned()
                .map(Ok)
                .chain(self.failures.iter().cloned().map(Err)),
        )
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.images.len() + self.failures.len())
    }
}

/// Mock implementation of `ResultOutput` for testing.
///
/// Captures records for later assertions.
#[derive(Default)]
pub struct MockResultOutput {
    records: Mutex<Vec<AnalysisRecord>>,
    flush_count: AtomicUsize,
}

impl MockResultOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured records.
    #[must_use]
    pub fn records(&self) -> Vec<AnalysisRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        self.flush_count.load(Ordering::SeqCst)
    }
}

impl ResultOutput for MockResultOutput {
    fn write(&self, record: &AnalysisRecord) -> anyhow::Result<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        self.flush_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
#[derive(Default)]
pub struct MockProgressSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn count(&self, predicate: impl Fn(&ProgressEvent) -> bool) -> usize {
        self.events().iter().filter(|e| predicate(e)).count()
    }

    /// Returns the number of `Started` events.
    #[must_use]
    pub fn started_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Started { .. }))
    }

    /// Returns the number of `Analyzed` events.
    #[must_use]
    pub fn analyzed_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Analyzed { .. }))
    }

    /// Returns the number of `Skipped` events.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Skipped { .. }))
    }

    /// Returns the `(processed, skipped, blurry)` counts of the `Finished`
    /// event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize, usize)> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished {
                processed,
                skipped,
                blurry,
            } => Some((*processed, *skipped, *blurry)),
            _ => None,
        })
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Face detector returning fixed boxes and counting its calls.
#[derive(Debug, Default)]
pub struct MockFaceDetector {
    faces: Vec<BoundingBox>,
    calls: AtomicUsize,
}

impl MockFaceDetector {
    /// Creates a detector that always returns `faces`.
    #[must_use]
    pub fn new(faces: Vec<BoundingBox>) -> Self {
        Self {
            faces,
            calls: AtomicUsize::new(0),
        }
    }

    /// Creates a detector returning `count` small boxes along the diagonal.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn with_faces(count: usize) -> Self {
        let faces = (0..count as u32)
            .map(|i| BoundingBox::new(4 + i * 12, 4 + i * 12, 10, 10))
            .collect();
        Self::new(faces)
    }

    /// Returns how many times `detect` ran.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FaceDetector for MockFaceDetector {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn detect(&self, _gray: &GrayImage) -> anyhow::Result<Vec<BoundingBox>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.faces.clone())
    }
}

/// Face detector that always fails, as a missing model would.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingFaceDetector;

impl FaceDetector for FailingFaceDetector {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn detect(&self, _gray: &GrayImage) -> anyhow::Result<Vec<BoundingBox>> {
        anyhow::bail!("cascade data not found")
    }
}
