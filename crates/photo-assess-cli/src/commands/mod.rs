//! CLI command definitions and handlers.

pub mod analyze;
pub mod enhance;

use clap::{Parser, Subcommand};

/// Photo Assess - image quality analysis and enhancement
#[derive(Parser)]
#[command(name = "photo-assess")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Measure brightness, contrast, sharpness, composition and color balance
    Analyze(analyze::AnalyzeArgs),
    /// Apply suggestion-driven adjustments to an image
    Enhance(enhance::EnhanceArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Everything ran and nothing needs attention.
    Success = 0,
    /// At least one analyzed image was rated blurry.
    IssuesFound = 1,
    /// The command failed.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}

/// Parse a non-negative floating-point threshold.
fn parse_non_negative(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("{value} must be a non-negative number"))
    }
}
