//! JSON output adapter.

use anyhow::Result;
use photo_assess_core::{AnalysisRecord, ResultOutput};
use std::io::{self, Write};
use std::sync::Mutex;

/// Layout of the JSON written to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonLayout {
    /// One compact object per line, written as records arrive.
    Lines,
    /// A single array written on flush.
    Array {
        /// Indent the array.
        pretty: bool,
    },
}

/// JSON output adapter.
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
    layout: JsonLayout,
    pending: Mutex<Vec<AnalysisRecord>>,
}

impl JsonOutput {
    /// Creates a new JSON output writing to stdout.
    #[must_use]
    pub fn stdout(layout: JsonLayout) -> Self {
        Self::new(Box::new(io::stdout()), layout)
    }

    /// Creates a new JSON output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, layout: JsonLayout) -> Self {
        Self {
            writer: Mutex::new(writer),
            layout,
            pending: Mutex::new(Vec::new()),
        }
    }

    #[allow(clippy::significant_drop_tightening)]
    fn write_line(&self, json: &str) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{json}")?;
        Ok(())
    }
}

impl ResultOutput for JsonOutput {
    fn write(&self, record: &AnalysisRecord) -> Result<()> {
        match self.layout {
            JsonLayout::Lines => self.write_line(&serde_json::to_string(record)?),
            JsonLayout::Array { .. } => {
                self.pending
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?
                    .push(record.clone());
                Ok(())
            }
        }
    }

    #[allow(clippy::significant_drop_tightening)]
    fn flush(&self) -> Result<()> {
        if let JsonLayout::Array { pretty } = self.layout {
            let records = std::mem::take(
                &mut *self
                    .pending
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?,
            );
            let json = if pretty {
                serde_json::to_string_pretty(&records)?
            } else {
                serde_json::to_string(&records)?
            };
            self.write_line(&json)?;
        }
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writer.flush()?;
        Ok(())
    }
}
