//! Where batch analysis gets its images from.

use thiserror::Error;

use crate::domain::ImageInfo;

/// An entry of an [`ImageSource`] that could not be read or decoded.
#[derive(Debug, Clone, Error)]
#[error("{path}: {reason}")]
pub struct LoadFailure {
    /// Path of the failed entry.
    pub path: String,
    /// Human-readable cause, including any context chain.
    pub reason: String,
}

impl LoadFailure {
    /// Records a failure for `path` from any error, keeping its full chain.
    pub fn new(path: impl Into<String>, error: &anyhow::Error) -> Self {
        Self {
            path: path.into(),
            reason: format!("{error:#}"),
        }
    }
}

/// Supplies decoded images to batch analysis.
pub trait ImageSource: Send + Sync {
    /// Iterates over the images of this source in a stable order.
    ///
    /// Entries that fail to load are yielded as [`LoadFailure`]s so callers
    /// can skip them and keep going.
    fn images(&self) -> Box<dyn Iterator<Item = Result<ImageInfo, LoadFailure>> + Send + '_>;

    /// Number of entries, when known up front.
    fn count_hint(&self) -> Option<usize>;
}
