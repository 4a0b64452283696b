//! Configuration file support for photo-assess.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/photo-assess/config.toml` (lowest priority)
//! - Project-local: `.photo-assess.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use photo_assess_core::{AnalyzerConfig, EnhancerConfig, MIN_KEEP_FRACTION};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Analyzer settings.
    pub analysis: AnalysisConfig,
    /// Enhancer settings.
    pub enhance: EnhanceConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
}

/// Analyzer configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Canny low hysteresis threshold.
    pub canny_low: Option<f32>,
    /// Canny high hysteresis threshold.
    pub canny_high: Option<f32>,
    /// Thirds region half-side is `min(w, h) / region_divisor`.
    pub region_divisor: Option<u32>,
    /// Laplacian variance below which an image is blurry.
    pub blurry_threshold: Option<f64>,
    /// Laplacian variance above which an image is sharp.
    pub sharp_threshold: Option<f64>,
}

/// Enhancer configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    /// Crop only when the thirds score is below this.
    pub crop_threshold: Option<f64>,
    /// Fraction of each dimension a crop keeps.
    pub crop_keep_fraction: Option<f64>,
    /// JPEG quality for written images (1-100).
    pub quality: Option<u8>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Include EXIF metadata.
    pub exif: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
    /// Print the text summary instead of JSON.
    pub summary: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/photo-assess/config.toml`
    /// 2. Project-local: `.photo-assess.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. If the merged values fail
    /// validation a warning is printed and the defaults are used instead.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}; ignoring configuration files");
            return Self::default();
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    fn validate(&self) -> Result<(), String> {
        let analysis = &self.analysis;
        for (name, value) in [
            ("analysis.canny_low", analysis.canny_low.map(f64::from)),
            ("analysis.canny_high", analysis.canny_high.map(f64::from)),
            ("analysis.blurry_threshold", analysis.blurry_threshold),
            ("analysis.sharp_threshold", analysis.sharp_threshold),
            ("enhance.crop_threshold", self.enhance.crop_threshold),
        ] {
            if let Some(v) = value {
                if v.is_nan() || v < 0.0 {
                    return Err(format!("{name} must be >= 0, got {v}"));
                }
            }
        }

        let defaults = AnalyzerConfig::default();
        let low = analysis.canny_low.unwrap_or(defaults.canny_low);
        let high = analysis.canny_high.unwrap_or(defaults.canny_high);
        if low > high {
            return Err(format!(
                "analysis.canny_low ({low}) must not exceed analysis.canny_high ({high})"
            ));
        }
        let blurry = analysis.blurry_threshold.unwrap_or(defaults.blurry_threshold);
        let sharp = analysis.sharp_threshold.unwrap_or(defaults.sharp_threshold);
        if blurry > sharp {
            return Err(format!(
                "analysis.blurry_threshold ({blurry}) must not exceed analysis.sharp_threshold ({sharp})"
            ));
        }

        if analysis.region_divisor == Some(0) {
            return Err("analysis.region_divisor must be at least 1".to_string());
        }

        if let Some(f) = self.enhance.crop_keep_fraction {
            if !(MIN_KEEP_FRACTION..=1.0).contains(&f) {
                return Err(format!(
                    "enhance.crop_keep_fraction must be in [{MIN_KEEP_FRACTION}, 1], got {f}"
                ));
            }
        }

        if let Some(q) = self.enhance.quality {
            if !(1..=100).contains(&q) {
                return Err(format!("enhance.quality must be 1-100, got {q}"));
            }
        }

        if let Some(ref f) = self.output.format {
            if f != "json" && f != "jsonl" {
                return Err(format!(
                    "output.format must be 'json' or 'jsonl', got '{f}'"
                ));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // General
        self.general.recursive = other.general.recursive.or(self.general.recursive);

        // Analysis
        self.analysis.canny_low = other.analysis.canny_low.or(self.analysis.canny_low);
        self.analysis.canny_high = other.analysis.canny_high.or(self.analysis.canny_high);
        self.analysis.region_divisor = other
            .analysis
            .region_divisor
            .or(self.analysis.region_divisor);
        self.analysis.blurry_threshold = other
            .analysis
            .blurry_threshold
            .or(self.analysis.blurry_threshold);
        self.analysis.sharp_threshold = other
            .analysis
            .sharp_threshold
            .or(self.analysis.sharp_threshold);

        // Enhance
        self.enhance.crop_threshold = other.enhance.crop_threshold.or(self.enhance.crop_threshold);
        self.enhance.crop_keep_fraction = other
            .enhance
            .crop_keep_fraction
            .or(self.enhance.crop_keep_fraction);
        self.enhance.quality = other.enhance.quality.or(self.enhance.quality);

        // Output
        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.exif = other.output.exif.or(self.output.exif);
        self.output.progress = other.output.progress.or(self.output.progress);
        self.output.summary = other.output.summary.or(self.output.summary);
    }

    /// Analyzer settings with hardcoded defaults filling the gaps.
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        let defaults = AnalyzerConfig::default();
        let analysis = &self.analysis;
        AnalyzerConfig {
            canny_low: analysis.canny_low.unwrap_or(defaults.canny_low),
            canny_high: analysis.canny_high.unwrap_or(defaults.canny_high),
            region_divisor: analysis.region_divisor.unwrap_or(defaults.region_divisor),
            blurry_threshold: analysis.blurry_threshold.unwrap_or(defaults.blurry_threshold),
            sharp_threshold: analysis.sharp_threshold.unwrap_or(defaults.sharp_threshold),
        }
    }

    /// Enhancer settings with hardcoded defaults filling the gaps.
    ///
    /// The crop solver shares the analyzer's Canny thresholds.
    pub fn enhancer_config(&self) -> EnhancerConfig {
        let defaults = EnhancerConfig::default();
        let analyzer = self.analyzer_config();
        EnhancerConfig {
            crop_threshold: self.enhance.crop_threshold.unwrap_or(defaults.crop_threshold),
            crop_keep_fraction: self
                .enhance
                .crop_keep_fraction
                .unwrap_or(defaults.crop_keep_fraction),
            canny_low: analyzer.canny_low,
            canny_high: analyzer.canny_high,
            ..defaults
        }
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("photo-assess").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.photo-assess.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".photo-assess.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
