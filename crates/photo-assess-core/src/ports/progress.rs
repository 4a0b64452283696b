//! Progress events of a batch analysis.

use crate::domain::SharpnessLevel;

/// One step of a batch run.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// An image is about to be analyzed.
    Started {
        /// Image path.
        path: String,
        /// Position in the batch, 0-based.
        index: usize,
        /// Batch size, if known.
        total: Option<usize>,
    },
    /// An image was analyzed.
    Analyzed {
        /// Image path.
        path: String,
        /// Sharpness rating of the image.
        sharpness_level: SharpnessLevel,
    },
    /// An image could not be loaded or analyzed.
    Skipped {
        /// Image path.
        path: String,
        /// Why it was skipped.
        reason: String,
    },
    /// The batch is done.
    Finished {
        /// Images analyzed.
        processed: usize,
        /// Images skipped.
        skipped: usize,
        /// Analyzed images rated blurry.
        blurry: usize,
    },
}

/// Receives [`ProgressEvent`]s, typically to drive a progress bar.
pub trait ProgressSink: Send + Sync {
    /// Handles one event.
    fn on_event(&self, event: ProgressEvent);
}
