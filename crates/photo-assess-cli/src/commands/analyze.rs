//! Analyze command - measure image quality metrics.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use photo_assess_adapters::{extract_exif, save_image, FsImageSource, DEFAULT_JPEG_QUALITY};
use photo_assess_core::{
    AnalysisRecord, AnalysisResult, Analyzer, AnalyzerConfig, ImageInfo, ImageSource,
    NoFaceDetector, ProgressEvent, ProgressSink, ResultOutput, SharpnessLevel,
};
use tracing::{debug, info, warn};

use super::{parse_non_negative, ExitCode};
use crate::config::AppConfig;
use crate::output::{JsonLayout, JsonOutput, ProgressBar, SummaryOutput};

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
}

/// Arguments of `photo-assess analyze`.
#[derive(Args, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct AnalyzeArgs {
    /// Files or directories to analyze
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Sharpness below this is rated blurry
    #[arg(long, value_parser = parse_non_negative)]
    pub blurry_threshold: Option<f64>,

    /// Sharpness above this is rated sharp
    #[arg(long, value_parser = parse_non_negative)]
    pub sharp_threshold: Option<f64>,

    /// Include EXIF metadata in output
    #[arg(long)]
    pub exif: bool,

    /// Write annotated `<stem>_viz.png` renders into this directory
    #[arg(long, value_name = "DIR")]
    pub viz_dir: Option<PathBuf>,

    /// Print a plain-text metrics summary instead of JSON
    #[arg(long)]
    pub summary: bool,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Merged config (populated by `with_config`, not from CLI).
    #[arg(skip)]
    config: Option<AppConfig>,
}

impl AnalyzeArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        args.blurry_threshold = args
            .blurry_threshold
            .or(config.analysis.blurry_threshold);
        args.sharp_threshold = args.sharp_threshold.or(config.analysis.sharp_threshold);

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_ref()
                .and_then(|s| match s.as_str() {
                    "json" => Some(OutputFormat::Json),
                    "jsonl" => Some(OutputFormat::Jsonl),
                    _ => None,
                });
        }

        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.exif {
            args.exif = config.output.exif.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }
        if !args.summary {
            args.summary = config.output.summary.unwrap_or(false);
        }

        args.config = Some(config.clone());

        args
    }

    /// Analyzer settings: config file values with CLI thresholds on top.
    fn analyzer_config(&self) -> AnalyzerConfig {
        let base = self
            .config
            .as_ref()
            .map(AppConfig::analyzer_config)
            .unwrap_or_default();
        AnalyzerConfig {
            blurry_threshold: self.blurry_threshold.unwrap_or(base.blurry_threshold),
            sharp_threshold: self.sharp_threshold.unwrap_or(base.sharp_threshold),
            ..base
        }
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    fn result_output(&self) -> Box<dyn ResultOutput> {
        if self.summary {
            return Box::new(SummaryOutput::stdout());
        }
        let layout = match self.format() {
            OutputFormat::Jsonl => JsonLayout::Lines,
            OutputFormat::Json => JsonLayout::Array {
                pretty: self.pretty,
            },
        };
        Box::new(JsonOutput::stdout(layout))
    }
}

/// Result of running the analyze command.
#[allow(dead_code)] // Fields exposed for programmatic use
pub struct AnalyzeResult {
    /// Number of images analyzed.
    pub processed: usize,
    /// Number of images skipped.
    pub skipped: usize,
    /// Number of images rated blurry.
    pub blurry: usize,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the analyze command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &AnalyzeArgs) -> Result<AnalyzeResult> {
    info!("Running analyze command on {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    if let Some(dir) = &args.viz_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let source = FsImageSource::new(args.paths.clone(), args.recursive);
    let total = source.count_hint();

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress_bar = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);

    let output = args.result_output();

    let config = args.analyzer_config();
    debug!(?config, "Analyzer configured");
    let analyzer = Analyzer::new(config, Arc::new(NoFaceDetector));

    process_images(&source, &analyzer, output.as_ref(), &progress_bar, args)
}

/// Analyze every image of `source`, writing one record per image.
fn process_images(
    source: &dyn ImageSource,
    analyzer: &Analyzer,
    output: &dyn ResultOutput,
    progress: &dyn ProgressSink,
    args: &AnalyzeArgs,
) -> Result<AnalyzeResult> {
    let total = source.count_hint();
    let mut processed = 0usize;
    let mut skipped = 0usize;
    let mut blurry = 0usize;

    for (index, item) in source.images().enumerate() {
        let image = match item {
            Ok(img) => img,
            Err(failure) => {
                progress.on_event(ProgressEvent::Skipped {
                    path: failure.path,
                    reason: failure.reason,
                });
                skipped += 1;
                continue;
            }
        };

        let path = image.path.clone();

        progress.on_event(ProgressEvent::Started {
            path: path.clone(),
            index,
            total,
        });

        let analysis = match analyzer.analyze(&image.image) {
            Ok(analysis) => analysis,
            Err(e) => {
                debug!("Analysis failed for {path}: {e}");
                progress.on_event(ProgressEvent::Skipped {
                    path,
                    reason: e.to_string(),
                });
                skipped += 1;
                continue;
            }
        };

        if let Some(dir) = &args.viz_dir {
            if let Err(e) = write_visualization(analyzer, &image, &analysis, dir) {
                warn!("Visualization failed for {path}: {e:#}");
            }
        }

        let sharpness_level = analysis.sharpness_level(analyzer.config());
        if sharpness_level == SharpnessLevel::Blurry {
            blurry += 1;
        }

        let exif = if args.exif {
            extract_exif(Path::new(&path))
        } else {
            None
        };

        let record = AnalysisRecord {
            path: path.clone(),
            timestamp: iso_timestamp(),
            sharpness_level,
            analysis,
            exif,
        };
        output.write(&record)?;

        progress.on_event(ProgressEvent::Analyzed {
            path,
            sharpness_level,
        });
        processed += 1;
    }

    output.flush()?;

    progress.on_event(ProgressEvent::Finished {
        processed,
        skipped,
        blurry,
    });

    let exit_code = if blurry > 0 {
        ExitCode::IssuesFound
    } else {
        ExitCode::Success
    };

    Ok(AnalyzeResult {
        processed,
        skipped,
        blurry,
        exit_code,
    })
}

/// Render the annotated copy of `image` to `<dir>/<stem>_viz.png`.
fn write_visualization(
    analyzer: &Analyzer,
    image: &ImageInfo,
    analysis: &AnalysisResult,
    dir: &Path,
) -> Result<PathBuf> {
    let stem = Path::new(&image.path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    let target = dir.join(format!("{stem}_viz.png"));
    let rendered = analyzer.render_visualization(&image.image, analysis)?;
    save_image(&target, &rendered, DEFAULT_JPEG_QUALITY)?;
    debug!("Wrote visualization {}", target.display());
    Ok(target)
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use photo_assess_test_support::{
        FailingFaceDetector, MockImageSource, MockProgressSink, MockResultOutput,
        SyntheticImageBuilder,
    };

    fn analyzer() -> Analyzer {
        Analyzer::new(AnalyzerConfig::default(), Arc::new(NoFaceDetector))
    }

    #[test]
    fn test_counts_and_exit_code() {
        let source = MockImageSource::new(vec![
            SyntheticImageBuilder::sharp_image(),
            SyntheticImageBuilder::blurry_image(),
        ])
        .with_failure("broken.jpg", "truncated");
        let output = MockResultOutput::new();
        let sink = MockProgressSink::new();

        let result =
            process_images(&source, &analyzer(), &output, &sink, &AnalyzeArgs::default()).unwrap();

        assert_eq!(result.processed, 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.blurry, 1);
        assert_eq!(result.exit_code, ExitCode::IssuesFound);

        let records = output.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sharpness_level, SharpnessLevel::Sharp);
        assert_eq!(records[1].sharpness_level, SharpnessLevel::Blurry);
        assert!(records.iter().all(|r| r.exif.is_none()));
        assert_eq!(output.flush_count(), 1);

        assert_eq!(sink.started_count(), 2);
        assert_eq!(sink.analyzed_count(), 2);
        assert_eq!(sink.skipped_count(), 1);
        assert_eq!(sink.finished_counts(), Some((2, 1, 1)));
    }

    #[test]
    fn test_no_blurry_images_is_success() {
        let source = MockImageSource::new(vec![SyntheticImageBuilder::sharp_image()]);
        let output = MockResultOutput::new();
        let sink = MockProgressSink::new();

        let result =
            process_images(&source, &analyzer(), &output, &sink, &AnalyzeArgs::default()).unwrap();

        assert_eq!(result.exit_code, ExitCode::Success);
        assert_eq!(sink.finished_counts(), Some((1, 0, 0)));
    }

    #[test]
    fn test_empty_source_still_flushes() {
        let source = MockImageSource::empty();
        let output = MockResultOutput::new();
        let sink = MockProgressSink::new();

        let result =
            process_images(&source, &analyzer(), &output, &sink, &AnalyzeArgs::default()).unwrap();

        assert_eq!(result.processed, 0);
        assert_eq!(output.flush_count(), 1);
        assert_eq!(sink.finished_counts(), Some((0, 0, 0)));
    }

    #[test]
    fn test_detector_failure_skips_image() {
        let source = MockImageSource::new(vec![SyntheticImageBuilder::sharp_image()]);
        let output = MockResultOutput::new();
        let sink = MockProgressSink::new();
        let analyzer = Analyzer::new(AnalyzerConfig::default(), Arc::new(FailingFaceDetector));

        let result =
            process_images(&source, &analyzer, &output, &sink, &AnalyzeArgs::default()).unwrap();

        assert_eq!(result.processed, 0);
        assert_eq!(result.skipped, 1);
        assert!(output.records().is_empty());
        assert_eq!(sink.started_count(), 1);
        assert_eq!(sink.skipped_count(), 1);
    }

    #[test]
    fn test_thresholds_change_the_rating() {
        let source = MockImageSource::new(vec![SyntheticImageBuilder::sharp_image()]);
        let output = MockResultOutput::new();
        let sink = MockProgressSink::new();
        let strict = Analyzer::new(
            AnalyzerConfig {
                blurry_threshold: f64::MAX,
                sharp_threshold: f64::MAX,
                ..AnalyzerConfig::default()
            },
            Arc::new(NoFaceDetector),
        );

        let result =
            process_images(&source, &strict, &output, &sink, &AnalyzeArgs::default()).unwrap();

        assert_eq!(result.blurry, 1);
        assert_eq!(output.records()[0].sharpness_level, SharpnessLevel::Blurry);
    }

    #[test]
    fn test_visualizations_written_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let source = MockImageSource::new(vec![SyntheticImageBuilder::checkerboard(64, 48)]);
        let output = MockResultOutput::new();
        let sink = MockProgressSink::new();
        let args = AnalyzeArgs {
            viz_dir: Some(dir.path().to_path_buf()),
            ..AnalyzeArgs::default()
        };

        process_images(&source, &analyzer(), &output, &sink, &args).unwrap();

        let viz = dir.path().join("checkerboard_viz.png");
        let decoded = image::open(&viz).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (64, 48));
    }

    #[test]
    fn test_with_config_fills_unset_args() {
        let config: AppConfig = toml::from_str(
            r"
[general]
recursive = true

[analysis]
blurry_threshold = 50.0
sharp_threshold = 900.0

[output]
format = 'json'
summary = true
",
        )
        .unwrap();

        let args = AnalyzeArgs::with_config(AnalyzeArgs::default(), &config);

        assert!(args.recursive);
        assert!(args.summary);
        assert_eq!(args.format(), OutputFormat::Json);
        let analyzer_config = args.analyzer_config();
        assert!((analyzer_config.blurry_threshold - 50.0).abs() < f64::EPSILON);
        assert!((analyzer_config.sharp_threshold - 900.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cli_args_win_over_config() {
        let config: AppConfig = toml::from_str(
            r"
[analysis]
blurry_threshold = 50.0
canny_low = 30.0

[output]
format = 'json'
",
        )
        .unwrap();
        let cli = AnalyzeArgs {
            blurry_threshold: Some(70.0),
            format: Some(OutputFormat::Jsonl),
            ..AnalyzeArgs::default()
        };

        let args = AnalyzeArgs::with_config(cli, &config);

        assert_eq!(args.format(), OutputFormat::Jsonl);
        let analyzer_config = args.analyzer_config();
        assert!((analyzer_config.blurry_threshold - 70.0).abs() < f64::EPSILON);
        assert!((analyzer_config.canny_low - 30.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_defaults_without_config() {
        let args = AnalyzeArgs::default();
        assert_eq!(args.format(), OutputFormat::Jsonl);
        assert_eq!(args.analyzer_config(), AnalyzerConfig::default());
    }

    #[test]
    fn test_timestamp_is_utc() {
        let ts = iso_timestamp();
        assert!(ts.ends_with('Z'), "{ts}");
        assert_eq!(ts.as_bytes()[10], b'T');
    }
}
