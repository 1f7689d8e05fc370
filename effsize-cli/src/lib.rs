#![warn(missing_docs)]
//! Effsize CLI Library
//!
//! Command-line front end for the effsize analysis pipeline: reads trial
//! rows from JSON, merges `effsize.toml` defaults with flags, runs the
//! analysis, and writes the effect-size report in the selected format.

mod config;
mod input;

pub use config::{AnalysisSection, CONFIG_FILE_NAME, ConfigError, EffsizeConfig, OutputSection};
pub use input::{InputError, TrialRecord, parse_trials, read_trials};

use clap::Parser;
use effsize::{AnalysisConfig, AnalysisError, OutputFormat, analyze};
use effsize::{format_human_output, generate_csv_report, generate_json_report};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Effsize CLI arguments
#[derive(Parser, Debug)]
#[command(name = "effsize")]
#[command(
    author,
    version,
    about = "Effsize - bootstrap effect sizes for within-subjects experiments"
)]
pub struct Cli {
    /// Input JSON file with trial rows
    pub input: PathBuf,

    /// Within-subject factor, in design order (repeatable)
    #[arg(long = "factor")]
    pub factors: Vec<String>,

    /// Observed (measured, not manipulated) factor (repeatable)
    #[arg(long = "observed")]
    pub observed: Vec<String>,

    /// Output format: json, csv, human
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Bootstrap replicate count
    #[arg(long)]
    pub replicates: Option<usize>,

    /// Confidence level (e.g. 0.95 for 95%)
    #[arg(long)]
    pub confidence: Option<f64>,

    /// Base seed for the resampling RNG
    #[arg(long)]
    pub seed: Option<u64>,

    /// Bootstrap worker threads (0 = use all available cores)
    #[arg(long, short = 'j')]
    pub threads: Option<usize>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

/// CLI failures
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration discovery/parsing failed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Input reading/validation failed
    #[error(transparent)]
    Input(#[from] InputError),

    /// The analysis pipeline failed
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// JSON rendering failed
    #[error("failed to render report: {0}")]
    Render(#[from] serde_json::Error),

    /// Writing the report failed
    #[error("failed to write report: {0}")]
    Write(#[from] std::io::Error),

    /// No factors from flags or configuration
    #[error("no within-subject factors specified (use --factor or effsize.toml)")]
    NoFactors,

    /// Confidence level outside (0, 1)
    #[error("confidence level must be strictly between 0 and 1, got {0}")]
    InvalidConfidence(f64),

    /// Unrecognized --format value
    #[error("unknown output format: {0}")]
    UnknownFormat(String),
}

/// Run the CLI; returns the process exit code.
pub fn run() -> i32 {
    let cli = Cli::parse();
    match try_run(&cli) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}

fn try_run(cli: &Cli) -> Result<(), CliError> {
    let file = EffsizeConfig::discover(Path::new("."))?;
    let analysis = resolve_analysis(cli, &file)?;
    let format_name = cli
        .format
        .clone()
        .unwrap_or_else(|| file.output.format.clone());
    let format: OutputFormat = format_name
        .parse()
        .map_err(|_| CliError::UnknownFormat(format_name))?;
    let output = cli
        .output
        .clone()
        .or_else(|| file.output.path.as_deref().map(PathBuf::from));

    let trials = read_trials(&cli.input, &analysis.factors)?;

    let spinner = if cli.quiet {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!(
            "bootstrapping {} replicates over {} trials",
            analysis.replicates,
            trials.len()
        ));
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    };

    let report = analyze(&trials, &analysis);
    spinner.finish_and_clear();
    let report = report?;

    if !cli.quiet {
        for warning in &report.warnings {
            eprintln!("warning: {}: {}", warning.effect, warning.detail);
        }
    }

    let rendered = match format {
        OutputFormat::Json => generate_json_report(&report)?,
        OutputFormat::Csv => generate_csv_report(&report),
        OutputFormat::Human => format_human_output(&report),
    };

    match output {
        Some(path) => std::fs::write(path, rendered)?,
        None => print!("{rendered}"),
    }
    Ok(())
}

/// Merge CLI flags over the configuration file into an [`AnalysisConfig`]
fn resolve_analysis(cli: &Cli, file: &EffsizeConfig) -> Result<AnalysisConfig, CliError> {
    let factors = if cli.factors.is_empty() {
        file.analysis.factors.clone()
    } else {
        cli.factors.clone()
    };
    if factors.is_empty() {
        return Err(CliError::NoFactors);
    }

    let observed = if cli.observed.is_empty() {
        file.analysis.observed.clone()
    } else {
        cli.observed.clone()
    };

    let confidence = cli.confidence.unwrap_or(file.analysis.confidence);
    if !(0.0 < confidence && confidence < 1.0) {
        return Err(CliError::InvalidConfidence(confidence));
    }
    let lower_tail = (1.0 - confidence) / 2.0;

    let threads = match cli.threads.unwrap_or(file.analysis.threads) {
        0 => None,
        n => Some(n),
    };

    Ok(AnalysisConfig {
        factors,
        observed,
        replicates: cli.replicates.unwrap_or(file.analysis.replicates),
        lower_tail,
        upper_tail: 1.0 - lower_tail,
        seed: cli.seed.unwrap_or(file.analysis.seed),
        threads,
    })
}
