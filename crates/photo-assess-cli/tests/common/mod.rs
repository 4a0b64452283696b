//! Shared helpers for CLI integration tests.

#![allow(dead_code, clippy::unwrap_used, deprecated)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use photo_assess_core::ImageInfo;
use photo_assess_test_support::write_png;

/// Command for the binary, isolated from the user's config files.
///
/// Runs in `workdir` with the XDG config home pointed at `workdir/xdg`.
pub fn photo_assess(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("photo-assess").unwrap();
    cmd.current_dir(workdir)
        .env("XDG_CONFIG_HOME", workdir.join("xdg"))
        .env("HOME", workdir)
        .env_remove("RUST_LOG");
    cmd
}

/// Writes `info` into `dir` under `name`, format chosen by extension.
pub fn write_fixture(dir: &Path, name: &str, info: &ImageInfo) -> PathBuf {
    let path = dir.join(name);
    write_png(&info.image, &path).unwrap();
    path
}

/// Parses each non-empty stdout line as a JSON value.
pub fn json_lines(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}
