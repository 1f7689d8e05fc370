#![warn(missing_docs)]
//! Effsize Statistical Engine
//!
//! Provides the core analysis for within-subjects experiments:
//! - Repeated-measures ANOVA decomposition with per-effect F statistics
//! - Generalized eta-squared (Olejnik & Algina 2003) effect sizes
//! - Subject-level percentile bootstrap (parallelized with Rayon)
//! - Empirical confidence-interval aggregation (type-7 quantiles)

mod anova;
mod bootstrap;
mod quantile;

pub use anova::{AnovaError, EffectRow, fit_anova};
pub use bootstrap::{BootstrapConfig, BootstrapError, BootstrapReplicate, run_bootstrap};
pub use quantile::{EffectInterval, QuantileWarning, confidence_intervals, quantile_type7};

/// Default number of bootstrap replicates.
///
/// Percentile intervals stabilize slowly; illustrative low counts (a few
/// hundred) are acceptable only for fast iteration, never for reporting.
pub const DEFAULT_REPLICATES: usize = 5000;

/// Default lower tail probability (2.5th percentile)
pub const DEFAULT_LOWER_TAIL: f64 = 0.025;

/// Default upper tail probability (97.5th percentile)
pub const DEFAULT_UPPER_TAIL: f64 = 0.975;

/// Default base seed for the resampling RNG
pub const DEFAULT_SEED: u64 = 42;

/// Upper bound on the number of within-subject factors.
///
/// The decomposition enumerates every factor subset, so cost grows as 2^k;
/// real repeated-measures designs stay far below this.
pub const MAX_FACTORS: usize = 12;
