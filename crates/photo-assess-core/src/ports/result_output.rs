//! Sink for per-image analysis records.

use crate::domain::AnalysisRecord;

/// Receives one [`AnalysisRecord`] per analyzed image.
///
/// Implementations decide the encoding (JSON, JSON Lines, plain-text
/// summary) and the destination.
pub trait ResultOutput: Send + Sync {
    /// Emits a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be encoded or written.
    fn write(&self, record: &AnalysisRecord) -> anyhow::Result<()>;

    /// Completes the output, writing anything still buffered.
    ///
    /// # Errors
    ///
    /// Returns an error if the final write fails.
    fn flush(&self) -> anyhow::Result<()>;
}
