//! EXIF metadata extraction.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ::exif::{In, Reader};
use tracing::debug;

/// Reads the primary-image EXIF fields of a JPEG or PNG file as display
/// strings keyed by tag name.
///
/// Returns `None` when the file has no readable EXIF block; metadata is
/// optional and never fails an analysis.
#[must_use]
pub fn extract_exif(path: &Path) -> Option<HashMap<String, String>> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = match Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(e) => {
            debug!("No EXIF in {}: {e}", path.display());
            return None;
        }
    };

    let map: HashMap<String, String> = exif
        .fields()
        .filter(|field| field.ifd_num == In::PRIMARY)
        .map(|field| {
            (
                field.tag.to_string(),
                field.display_value().with_unit(&exif).to_string(),
            )
        })
        .collect();

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}
