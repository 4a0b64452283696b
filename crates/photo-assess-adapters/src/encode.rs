//! Raster encoding of output buffers.

use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};
use tracing::debug;

/// JPEG quality used when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Output formats for enhanced and annotated images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Baseline JPEG with the given quality (1-100).
    Jpeg {
        /// Encoder quality.
        quality: u8,
    },
    /// Lossless PNG.
    Png,
}

impl OutputFormat {
    /// Picks the format from a file extension, JPEG for anything but `.png`.
    #[must_use]
    pub fn from_path(path: &Path, quality: u8) -> Self {
        let is_png = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if is_png {
            Self::Png
        } else {
            Self::Jpeg { quality }
        }
    }
}

/// Encodes `image` into `writer`.
///
/// # Errors
///
/// Returns an error for an out-of-range JPEG quality or if encoding fails.
pub fn write_image<W: Write>(writer: &mut W, image: &RgbImage, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Jpeg { quality } => {
            if !(1..=100).contains(&quality) {
                bail!("JPEG quality must be between 1 and 100, got {quality}");
            }
            JpegEncoder::new_with_quality(writer, quality)
                .encode_image(image)
                .context("Failed to encode JPEG")
        }
        OutputFormat::Png => {
            let mut buffer = Cursor::new(Vec::new());
            image
                .write_to(&mut buffer, ImageFormat::Png)
                .context("Failed to encode PNG")?;
            writer
                .write_all(buffer.get_ref())
                .context("Failed to write PNG")
        }
    }
}

/// Encodes `image` into an in-memory buffer.
///
/// # Errors
///
/// See [`write_image`].
pub fn encode_image(image: &RgbImage, format: OutputFormat) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    write_image(&mut bytes, image, format)?;
    Ok(bytes)
}

/// Saves `image` to `path`, choosing PNG or JPEG from the extension.
///
/// # Errors
///
/// Returns an error if the file cannot be created or encoding fails.
pub fn save_image(path: &Path, image: &RgbImage, quality: u8) -> Result<()> {
    let format = OutputFormat::from_path(path, quality);
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_image(&mut writer, image, format)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    debug!(?format, "Saved {}", path.display());
    Ok(())
}
