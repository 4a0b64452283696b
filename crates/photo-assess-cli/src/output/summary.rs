//! Plain-text metrics summary output.

use anyhow::Result;
use photo_assess_core::{AnalysisRecord, ResultOutput};
use std::io::{self, Write};
use std::sync::Mutex;

/// Writes the human-readable metrics block for each record.
pub struct SummaryOutput {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl SummaryOutput {
    /// Creates a summary output writing to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Creates a summary output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl ResultOutput for SummaryOutput {
    #[allow(clippy::significant_drop_tightening)]
    fn write(&self, record: &AnalysisRecord) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{}", record.path)?;
        write!(writer, "{}", record.analysis.summary())?;
        writeln!(writer)?;
        Ok(())
    }

    #[allow(clippy::significant_drop_tightening)]
    fn flush(&self) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writer.flush()?;
        Ok(())
    }
}
