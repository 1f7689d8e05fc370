#![warn(missing_docs)]
//! # Effsize
//!
//! Effect-size estimation for within-subjects (repeated-measures)
//! experiments, built for reporting generalized eta-squared with bootstrap
//! confidence intervals in human-computer-interaction studies:
//! - **Aggregation**: repeated trials collapse to one mean per subject and
//!   condition cell, with the fully-crossed design validated up front
//! - **Estimator**: repeated-measures ANOVA over all factor subsets with
//!   generalized eta-squared (Olejnik & Algina) per effect
//! - **Bootstrap**: subjects resampled with replacement, relabeled as
//!   synthetic subjects, re-fitted in parallel (Rayon), reproducible for a
//!   fixed seed regardless of worker count
//! - **Report**: one row per effect with F, degrees of freedom, ges, and
//!   empirical percentile confidence bounds
//!
//! ## Quick Start
//!
//! ```ignore
//! use effsize::prelude::*;
//!
//! let trials: Vec<Trial> = load_trials();
//! let config = AnalysisConfig {
//!     factors: vec!["layout".into(), "size".into()],
//!     ..Default::default()
//! };
//! let report = analyze(&trials, &config)?;
//! println!("{}", format_human_output(&report));
//! ```

mod run;

pub use run::{AnalysisConfig, AnalysisError, analyze};

// Re-export the data model
pub use effsize_core::{AggregatedData, DataError, Design, Factor, Trial, aggregate};

// Re-export the statistical engine
pub use effsize_stats::{
    AnovaError, BootstrapConfig, BootstrapError, BootstrapReplicate, DEFAULT_LOWER_TAIL,
    DEFAULT_REPLICATES, DEFAULT_SEED, DEFAULT_UPPER_TAIL, EffectInterval, EffectRow,
    QuantileWarning, confidence_intervals, fit_anova, quantile_type7, run_bootstrap,
};

// Re-export report types and writers
pub use effsize_report::{
    EffectSizeReport, EffectSummary, OutputFormat, ReportMeta, ReportWarning, WarningKind,
    format_human_output, generate_csv_report, generate_json_report,
};

/// Common imports for typical usage
pub mod prelude {
    pub use crate::{
        AnalysisConfig, AnalysisError, EffectSizeReport, Trial, analyze, format_human_output,
        generate_csv_report, generate_json_report,
    };
}
