//! Enhance command - apply suggestion-driven adjustments to an image.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use photo_assess_adapters::{read_bytes, save_image, DEFAULT_JPEG_QUALITY};
use photo_assess_core::{Analyzer, Enhancer, NoFaceDetector, PhotoEngine};
use tracing::{info, warn};

use super::ExitCode;
use crate::config::AppConfig;

/// Arguments of `photo-assess enhance`.
#[derive(Args, Clone, Default)]
pub struct EnhanceArgs {
    /// Image to enhance (JPEG or PNG)
    pub image: PathBuf,

    /// Where to write the enhanced image; `.png` selects PNG, anything else JPEG
    #[arg(short, long, value_name = "OUT")]
    pub output: PathBuf,

    /// Improvement suggestion (repeatable)
    #[arg(short = 's', long = "suggestion", value_name = "TEXT")]
    pub suggestions: Vec<String>,

    /// Read one suggestion per non-empty line of this file
    #[arg(long, value_name = "FILE")]
    pub suggestions_file: Option<PathBuf>,

    /// JPEG quality (1-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Also write the annotated analysis of the input image here
    #[arg(long, value_name = "PATH")]
    pub viz: Option<PathBuf>,

    /// Merged config (populated by `with_config`, not from CLI).
    #[arg(skip)]
    config: Option<AppConfig>,
}

impl EnhanceArgs {
    /// Apply configuration file values, respecting CLI precedence.
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        args.quality = args.quality.or(config.enhance.quality);
        args.config = Some(config.clone());
        args
    }

    /// Get JPEG quality with fallback to the encoder default.
    fn quality(&self) -> u8 {
        self.quality.unwrap_or(DEFAULT_JPEG_QUALITY)
    }

    fn engine(&self) -> PhotoEngine {
        let config = self.config.clone().unwrap_or_default();
        PhotoEngine::new(
            Analyzer::new(config.analyzer_config(), Arc::new(NoFaceDetector)),
            Enhancer::new(config.enhancer_config()),
        )
    }

    /// Suggestions from `-s` flags followed by those from the file.
    fn collect_suggestions(&self) -> Result<Vec<String>> {
        let mut suggestions = self.suggestions.clone();
        if let Some(path) = &self.suggestions_file {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read suggestions: {}", path.display()))?;
            suggestions.extend(parse_suggestion_lines(&text));
        }
        Ok(suggestions)
    }
}

/// Non-empty trimmed lines of a suggestions file.
fn parse_suggestion_lines(text: &str) -> impl Iterator<Item = String> + '_ {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
}

/// Run the enhance command.
///
/// Prints the applied adjustment vector as JSON on stdout.
pub fn run(args: &EnhanceArgs) -> Result<ExitCode> {
    let suggestions = args.collect_suggestions()?;
    if suggestions.is_empty() {
        warn!("No suggestions given, the image is written unchanged");
    }

    let bytes = read_bytes(&args.image)?;
    let engine = args.engine();
    let enhancement = engine
        .enhance_bytes(&bytes, &suggestions)
        .with_context(|| format!("Failed to enhance {}", args.image.display()))?;

    save_image(&args.output, &enhancement.image, args.quality())?;
    info!(
        "Wrote {} ({}x{})",
        args.output.display(),
        enhancement.image.width(),
        enhancement.image.height()
    );

    if let Some(viz) = &args.viz {
        write_visualization(&engine, &bytes, &enhancement.analysis, viz, args.quality())?;
    }

    println!("{}", serde_json::to_string(&enhancement.adjustments)?);

    Ok(ExitCode::Success)
}

fn write_visualization(
    engine: &PhotoEngine,
    bytes: &[u8],
    analysis: &photo_assess_core::AnalysisResult,
    target: &Path,
    quality: u8,
) -> Result<()> {
    let rendered = engine
        .analyzer()
        .render_visualization_bytes(bytes, analysis)
        .context("Failed to render visualization")?;
    save_image(target, &rendered, quality)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_lines_skip_blanks() {
        let lines: Vec<_> =
            parse_suggestion_lines("increase brightness\n\n   \n  add warmth  \n").collect();
        assert_eq!(lines, vec!["increase brightness", "add warmth"]);
    }

    #[test]
    fn test_flags_come_before_file_lines() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("suggestions.txt");
        std::fs::write(&file, "reduce contrast\n").unwrap();
        let args = EnhanceArgs {
            suggestions: vec!["more saturation".into()],
            suggestions_file: Some(file),
            ..EnhanceArgs::default()
        };

        assert_eq!(
            args.collect_suggestions().unwrap(),
            vec!["more saturation", "reduce contrast"]
        );
    }

    #[test]
    fn test_missing_suggestions_file_is_an_error() {
        let args = EnhanceArgs {
            suggestions_file: Some(PathBuf::from("/no/such/suggestions.txt")),
            ..EnhanceArgs::default()
        };
        let err = args.collect_suggestions().unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read suggestions"));
    }

    #[test]
    fn test_quality_layering() {
        let config: AppConfig = toml::from_str("[enhance]\nquality = 70\n").unwrap();

        let from_config = EnhanceArgs::with_config(EnhanceArgs::default(), &config);
        assert_eq!(from_config.quality(), 70);

        let cli = EnhanceArgs {
            quality: Some(85),
            ..EnhanceArgs::default()
        };
        assert_eq!(EnhanceArgs::with_config(cli, &config).quality(), 85);

        assert_eq!(EnhanceArgs::default().quality(), DEFAULT_JPEG_QUALITY);
    }

    #[test]
    fn test_engine_uses_config() {
        let config: AppConfig =
            toml::from_str("[enhance]\ncrop_threshold = 0.9\n[analysis]\nregion_divisor = 6\n")
                .unwrap();
        let args = EnhanceArgs::with_config(EnhanceArgs::default(), &config);
        let engine = args.engine();
        assert!((engine.enhancer().config().crop_threshold - 0.9).abs() < f64::EPSILON);
        assert_eq!(engine.analyzer().config().region_divisor, 6);
    }

    #[test]
    fn test_visualization_honors_quality() {
        let dir = tempfile::tempdir().unwrap();
        let scene = photo_assess_test_support::SyntheticImageBuilder::warm_scene(96, 72);
        let bytes = photo_assess_test_support::encode_png(&scene.image).unwrap();
        let engine = EnhanceArgs::default().engine();
        let analysis = engine.analyze_bytes(&bytes).unwrap();

        let low = dir.path().join("low.jpg");
        let high = dir.path().join("high.jpg");
        write_visualization(&engine, &bytes, &analysis, &low, 10).unwrap();
        write_visualization(&engine, &bytes, &analysis, &high, 100).unwrap();

        let low_size = std::fs::metadata(&low).unwrap().len();
        let high_size = std::fs::metadata(&high).unwrap().len();
        assert!(low_size < high_size, "low={low_size} high={high_size}");
    }
}
