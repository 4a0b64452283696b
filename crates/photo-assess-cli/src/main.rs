//! Photo Assess CLI - image quality analysis and enhancement tool.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::analyze::AnalyzeArgs;
use commands::enhance::EnhanceArgs;
use commands::{Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load();

    let outcome = match cli.command {
        Commands::Analyze(args) => {
            commands::analyze::run(&AnalyzeArgs::with_config(args, &config))
                .map(|result| result.exit_code)
        }
        Commands::Enhance(args) => commands::enhance::run(&EnhanceArgs::with_config(args, &config)),
    };

    let exit_code = match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error
        }
    };

    exit_code.into()
}
