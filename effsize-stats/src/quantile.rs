//! Empirical Quantiles and Confidence-Interval Aggregation
//!
//! Collects each effect's generalized eta-squared across all bootstrap
//! replicates and takes the empirical tail quantiles.
//!
//! Quantile rule: type 7 (Hyndman & Fan 1996), linear interpolation
//! between order statistics at rank p * (n - 1). Type 7 is the default of
//! most statistics packages and never extrapolates: with too few
//! replicates to resolve a requested tail the estimate clamps toward the
//! observed extremes, and a [`QuantileWarning`] reports the shortfall
//! instead of widening the interval by invention.

use crate::anova::EffectRow;
use crate::bootstrap::{BootstrapError, BootstrapReplicate};

/// The bootstrap confidence interval for one effect's ges
#[derive(Debug, Clone, PartialEq)]
pub struct EffectInterval {
    /// Effect name, matching the point-estimate row
    pub effect: String,
    /// Empirical quantile at the lower tail
    pub lower: f64,
    /// Empirical quantile at the upper tail
    pub upper: f64,
}

/// Non-fatal precision warning: a requested tail quantile cannot be
/// resolved by the available replicate count and was clamped toward the
/// observed extremes.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileWarning {
    /// Affected effect
    pub effect: String,
    /// The unresolvable tail probability
    pub tail: f64,
    /// Replicates actually available
    pub replicates: usize,
}

/// Type-7 empirical quantile of a sorted sample.
///
/// Interpolates linearly between order statistics; the result always lies
/// within the observed range. Returns 0.0 for an empty sample (callers
/// guarantee non-empty input; this mirrors how the rest of the crate
/// avoids panicking on degenerate slices).
pub fn quantile_type7(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let rank = p.clamp(0.0, 1.0) * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = (lower_idx + 1).min(n - 1);
    let fraction = rank - lower_idx as f64;

    sorted[lower_idx] + fraction * (sorted[upper_idx] - sorted[lower_idx])
}

/// Aggregate bootstrap replicates into per-effect confidence intervals.
///
/// Replicate arrival order is irrelevant: only the multiset of ges values
/// per effect matters. Effects are identified by row position (every
/// replicate fits the same effect table in the same order).
pub fn confidence_intervals(
    point: &[EffectRow],
    replicates: &[BootstrapReplicate],
    lower_tail: f64,
    upper_tail: f64,
) -> Result<(Vec<EffectInterval>, Vec<QuantileWarning>), BootstrapError> {
    if !(0.0 < lower_tail && lower_tail < upper_tail && upper_tail < 1.0) {
        return Err(BootstrapError::InvalidTails {
            lower: lower_tail,
            upper: upper_tail,
        });
    }

    let mut intervals = Vec::with_capacity(point.len());
    let mut warnings = Vec::new();

    for (index, row) in point.iter().enumerate() {
        let mut values: Vec<f64> = replicates
            .iter()
            .filter_map(|replicate| replicate.rows.get(index))
            .map(|r| {
                debug_assert_eq!(r.effect, row.effect);
                r.ges
            })
            .collect();
        if values.is_empty() {
            return Err(BootstrapError::EmptyDistribution {
                effect: row.effect.clone(),
            });
        }
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let n = values.len();
        // a tail probability below 1/n (or above 1 - 1/n) falls inside the
        // first (last) order-statistic gap; the estimate is effectively the
        // observed extreme
        if (n as f64) * lower_tail < 1.0 {
            warnings.push(QuantileWarning {
                effect: row.effect.clone(),
                tail: lower_tail,
                replicates: n,
            });
        }
        if (n as f64) * (1.0 - upper_tail) < 1.0 {
            warnings.push(QuantileWarning {
                effect: row.effect.clone(),
                tail: upper_tail,
                replicates: n,
            });
        }

        intervals.push(EffectInterval {
            effect: row.effect.clone(),
            lower: quantile_type7(&values, lower_tail),
            upper: quantile_type7(&values, upper_tail),
        });
    }

    Ok((intervals, warnings))
}
