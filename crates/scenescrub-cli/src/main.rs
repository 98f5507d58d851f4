//! scenescrub command-line interface.
//!
//! Loads a host scene document, runs the analysis core, and optionally the
//! autofix pipeline. Exit-code policy lives here, not in the core: analyze
//! fails the process on CRITICAL results (and on warnings with `--strict`)
//! so CI can gate exports.

mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::OutputFormat;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "scenescrub",
    version,
    about = "Scene bloat analysis and auto-repair for asset export pipelines"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a scene document and report bloat, duplicates, and static bones
    Analyze {
        /// Path to the host scene document (JSON)
        input: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Fail on warnings in addition to criticals
        #[arg(long)]
        strict: bool,

        /// Path to a thresholds override file (JSON)
        #[arg(long)]
        thresholds: Option<PathBuf>,
    },
    /// Analyze, repair, and write the mutated scene document
    Autofix {
        /// Path to the host scene document (JSON)
        input: PathBuf,

        /// Output path for the repaired scene document
        #[arg(short, long)]
        output: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Path to a thresholds override file (JSON)
        #[arg(long)]
        thresholds: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Analyze {
            input,
            format,
            strict,
            thresholds,
        } => commands::analyze::run(&input, format, strict, thresholds.as_deref()),
        Command::Autofix {
            input,
            output,
            format,
            thresholds,
        } => commands::autofix::run(&input, &output, format, thresholds.as_deref()),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{}: {:#}", "error".red().bold(), err);
            ExitCode::from(2)
        }
    }
}
