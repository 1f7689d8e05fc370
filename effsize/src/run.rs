//! Top-Level Analysis Driver
//!
//! Wires the pipeline: aggregation -> point estimate -> bootstrap ->
//! interval aggregation -> merged report. Each stage receives immutable
//! values from the previous one; nothing is shared mutably.

use chrono::Utc;
use effsize_core::{DataError, Trial, aggregate};
use effsize_report::{EffectSizeReport, ReportError, ReportMeta, SCHEMA_VERSION, build_report};
use effsize_stats::{
    AnovaError, BootstrapConfig, BootstrapError, DEFAULT_LOWER_TAIL, DEFAULT_REPLICATES,
    DEFAULT_SEED, DEFAULT_UPPER_TAIL, confidence_intervals, fit_anova, run_bootstrap,
};
use thiserror::Error;

/// Configuration for one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Within-subject factor names, in trial level order; also the report
    /// row order for main effects
    pub factors: Vec<String>,
    /// Subset of `factors` that were observed (measured) rather than
    /// manipulated; joins other effects' ges denominators
    pub observed: Vec<String>,
    /// Bootstrap replicate count
    pub replicates: usize,
    /// Lower tail probability of the confidence interval
    pub lower_tail: f64,
    /// Upper tail probability of the confidence interval
    pub upper_tail: f64,
    /// Base RNG seed for the resampling
    pub seed: u64,
    /// Bootstrap parallelism degree; `None` uses the global Rayon pool
    pub threads: Option<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            factors: Vec::new(),
            observed: Vec::new(),
            replicates: DEFAULT_REPLICATES,
            lower_tail: DEFAULT_LOWER_TAIL,
            upper_tail: DEFAULT_UPPER_TAIL,
            seed: DEFAULT_SEED,
            threads: None,
        }
    }
}

/// Any failure of the analysis pipeline
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input data is invalid (missing cells, degenerate factors, ...)
    #[error(transparent)]
    Data(#[from] DataError),

    /// The point-estimate decomposition failed
    #[error(transparent)]
    Anova(#[from] AnovaError),

    /// The bootstrap run failed
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    /// Report assembly failed
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Run the complete analysis: aggregation, point estimate, bootstrap,
/// confidence intervals, merged report.
pub fn analyze(trials: &[Trial], config: &AnalysisConfig) -> Result<EffectSizeReport, AnalysisError> {
    for name in &config.observed {
        if !config.factors.contains(name) {
            return Err(DataError::UnknownFactor { name: name.clone() }.into());
        }
    }

    let data = aggregate(&config.factors, trials)?;
    let point = fit_anova(&data, &config.observed)?;

    let bootstrap_config = BootstrapConfig {
        replicates: config.replicates,
        seed: config.seed,
        threads: config.threads,
    };
    let replicates = run_bootstrap(&data, &config.observed, &bootstrap_config)?;
    let (intervals, warnings) =
        confidence_intervals(&point, &replicates, config.lower_tail, config.upper_tail)?;

    let meta = ReportMeta {
        schema_version: SCHEMA_VERSION,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        subjects: data.subject_count(),
        factors: config.factors.clone(),
        replicates: config.replicates,
        lower_tail: config.lower_tail,
        upper_tail: config.upper_tail,
        seed: config.seed,
    };

    Ok(build_report(meta, &point, &intervals, &warnings)?)
}
