//! Filesystem adapter for loading images.

use anyhow::{Context, Result};
use photo_assess_core::{decode, ImageInfo, ImageSource, LoadFailure};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Extensions the engine can decode.
const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Reads JPEG and PNG files from disk and decodes them through the core.
#[derive(Debug, Clone)]
pub struct FsImageSource {
    paths: Vec<PathBuf>,
    recursive: bool,
}

impl FsImageSource {
    /// Creates a new filesystem image source.
    ///
    /// # Arguments
    ///
    /// * `paths` - Files or directories to scan
    /// * `recursive` - Whether to recurse into subdirectories
    #[must_use]
    pub const fn new(paths: Vec<PathBuf>, recursive: bool) -> Self {
        Self { paths, recursive }
    }

    /// Lists the image files under the configured paths, sorted within each
    /// directory.
    #[must_use]
    pub fn files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for path in &self.paths {
            if path.is_file() {
                if is_supported_image(path) {
                    files.push(path.clone());
                } else {
                    warn!("Unsupported file type: {}", path.display());
                }
            } else if path.is_dir() {
                self.collect_from_dir(path, &mut files);
            } else {
                warn!("Path does not exist: {}", path.display());
            }
        }

        files
    }

    fn collect_from_dir(&self, dir: &Path, files: &mut Vec<PathBuf>) {
        let mut entries: Vec<PathBuf> = match std::fs::read_dir(dir) {
            Ok(entries) => entries.flatten().map(|entry| entry.path()).collect(),
            Err(e) => {
                warn!("Failed to read directory {}: {e}", dir.display());
                return;
            }
        };
        entries.sort();

        for path in entries {
            if path.is_file() && is_supported_image(&path) {
                files.push(path);
            } else if path.is_dir() && self.recursive {
                self.collect_from_dir(&path, files);
            }
        }
    }
}

impl ImageSource for FsImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = Result<ImageInfo, LoadFailure>> + Send + '_> {
        let files = self.files();
        debug!("Found {} image files", files.len());

        Box::new(files.into_iter().map(|path| {
            load_image(&path).map_err(|e| LoadFailure::new(path.to_string_lossy(), &e))
        }))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.files().len())
    }
}

/// Checks if a path has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e.as_str()))
}

/// Reads and decodes a single image file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a decodable image.
pub fn load_image(path: &Path) -> Result<ImageInfo> {
    let bytes = read_bytes(path)?;
    let image = decode(&bytes).with_context(|| format!("Failed to decode image: {}", path.display()))?;
    Ok(ImageInfo::new(path.to_string_lossy(), image))
}

/// Reads a file's raw bytes.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("test.jpg")));
        assert!(is_supported_image(Path::new("test.JPEG")));
        assert!(is_supported_image(Path::new("test.png")));
        assert!(!is_supported_image(Path::new("test.cr2")));
        assert!(!is_supported_image(Path::new("test.webp")));
        assert!(!is_supported_image(Path::new("test.txt")));
        assert!(!is_supported_image(Path::new("test")));
    }

    #[test]
    fn test_missing_file_fails_with_path() {
        let err = load_image(Path::new("/definitely/not/here.png"))
            .err()
            .map(|e| format!("{e:#}"))
            .unwrap_or_default();
        assert!(err.contains("/definitely/not/here.png"));
    }
}
