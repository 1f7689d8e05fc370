//! Repeated-Measures ANOVA Decomposition
//!
//! Fits the standard univariate repeated-measures model over a fully-crossed
//! within-subjects design, treating subject as a crossed random factor.
//!
//! Sums of squares for every model term are computed from marginal totals by
//! inclusion-exclusion over sub-margins, the classical identity for balanced
//! designs: for a term T, SS(T) = sum over subsets T' of T of
//! (-1)^(|T|-|T'|) * U(T'), where U(T') is the sum over the T'-margin of
//! (margin total)^2 / (observations per margin cell).
//!
//! For each effect E (a non-empty subset of factors) the error term is the
//! E x subject interaction: F = MS_E / MS_(ExS). Generalized eta-squared
//! follows Olejnik & Algina (2003): SS_E over SS_E plus every variance
//! source involving subjects (subject main effect and all error terms),
//! plus the SS of observed-factor effects other than E. With no observed
//! factors (fully manipulated designs, the default) the last term is empty,
//! which matches the `ges` column of R's `ezANOVA`/`afex`.

use crate::MAX_FACTORS;
use effsize_core::{AggregatedData, DataError};
use thiserror::Error;

/// One fitted effect: a main factor or an interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectRow {
    /// Effect name: factor names joined with `:` (e.g. `layout:size`)
    pub effect: String,
    /// Numerator degrees of freedom
    pub df_num: f64,
    /// Denominator degrees of freedom
    pub df_den: f64,
    /// F statistic (MS_effect / MS_error). Infinite when the effect has
    /// signal but a zero residual, which only occurs on noise-free
    /// synthetic data.
    pub f_value: f64,
    /// Effect sum of squares
    pub ss: f64,
    /// Error (effect x subject) sum of squares
    pub ss_error: f64,
    /// Generalized eta-squared
    pub ges: f64,
}

/// Errors from the variance decomposition
#[derive(Debug, Clone, Error)]
pub enum AnovaError {
    /// A factor name was not part of the design
    #[error(transparent)]
    Data(#[from] DataError),

    /// Denominator degrees of freedom require at least 2 subjects
    #[error("repeated-measures ANOVA requires at least 2 subjects, got {got}")]
    TooFewSubjects {
        /// Subjects available
        got: usize,
    },

    /// Subset enumeration cost grows as 2^k
    #[error("at most {max} within-subject factors are supported, got {got}")]
    TooManyFactors {
        /// Factors in the design
        got: usize,
        /// Supported maximum
        max: usize,
    },

    /// Zero total variance: every aggregated observation is identical
    #[error("response is constant across all observations; nothing to decompose")]
    ConstantResponse,
}

/// Fit the repeated-measures ANOVA and compute generalized eta-squared
/// for every effect.
///
/// `observed` names the factors that were measured rather than manipulated;
/// their variance joins every other effect's ges denominator. Pass an empty
/// slice for fully manipulated designs.
///
/// Rows are ordered main effects first (factor declaration order), then
/// interactions by ascending order. Deterministic: identical input yields
/// identical output.
pub fn fit_anova(
    data: &AggregatedData,
    observed: &[String],
) -> Result<Vec<EffectRow>, AnovaError> {
    let design = data.design();
    let factors = design.factors();
    let k = factors.len();
    let n_subjects = data.subject_count();
    let n_cells = data.cell_count();

    if n_subjects < 2 {
        return Err(AnovaError::TooFewSubjects { got: n_subjects });
    }
    if k > MAX_FACTORS {
        return Err(AnovaError::TooManyFactors {
            got: k,
            max: MAX_FACTORS,
        });
    }

    let mut observed_mask = 0_usize;
    for name in observed {
        let position = factors
            .iter()
            .position(|f| f.name() == name)
            .ok_or_else(|| DataError::UnknownFactor { name: name.clone() })?;
        observed_mask |= 1 << position;
    }

    let level_counts: Vec<usize> = factors.iter().map(|f| f.level_count()).collect();
    let cell_levels: Vec<Vec<usize>> = (0..n_cells).map(|c| design.cell_levels(c)).collect();
    let n_total = (n_subjects * n_cells) as f64;
    let full = 1_usize << k;

    // Marginal contributions U(m, b): margin over the factors in mask m,
    // additionally by subject when b = 1.
    let mut u = [vec![0.0_f64; full], vec![0.0_f64; full]];
    for b in 0..2 {
        for m in 0..full {
            let mut group_count = if b == 1 { n_subjects } else { 1 };
            for (i, &levels) in level_counts.iter().enumerate() {
                if m >> i & 1 == 1 {
                    group_count *= levels;
                }
            }
            let mut totals = vec![0.0_f64; group_count];
            for s in 0..n_subjects {
                let row = data.row(s);
                for (c, &value) in row.iter().enumerate() {
                    let mut group = 0;
                    let mut radix = 1;
                    if b == 1 {
                        group = s;
                        radix = n_subjects;
                    }
                    for (i, &levels) in level_counts.iter().enumerate() {
                        if m >> i & 1 == 1 {
                            group += cell_levels[c][i] * radix;
                            radix *= levels;
                        }
                    }
                    totals[group] += value;
                }
            }
            let per_group = n_total / group_count as f64;
            u[b][m] = totals.iter().map(|t| t * t).sum::<f64>() / per_group;
        }
    }

    // Term sums of squares by inclusion-exclusion over sub-margins.
    // Tiny negative residues from cancellation are clamped to zero.
    let mut ss = [vec![0.0_f64; full], vec![0.0_f64; full]];
    for b in 0..2 {
        for m in 0..full {
            let mut acc = 0.0;
            let mut sub = m;
            loop {
                for (bp, u_bp) in u.iter().enumerate().take(b + 1) {
                    let dropped = (m.count_ones() - sub.count_ones()) as usize + (b - bp);
                    let sign = if dropped % 2 == 0 { 1.0 } else { -1.0 };
                    acc += sign * u_bp[sub];
                }
                if sub == 0 {
                    break;
                }
                sub = (sub - 1) & m;
            }
            ss[b][m] = acc.max(0.0);
        }
    }
    // (m = 0, b = 0) is the grand-mean contribution, not a model term
    ss[0][0] = 0.0;

    // One observation per (subject, cell): SS_total = sum(x^2) - G^2/N
    let sum_sq = u[1][full - 1];
    let ss_total = sum_sq - u[0][0];
    if ss_total <= sum_sq.abs() * 1e-12 {
        return Err(AnovaError::ConstantResponse);
    }

    // Subject SS and every subject-interaction error SS
    let error_sum: f64 = ss[1].iter().sum();
    // SS of effects involving an observed factor
    let observed_sum: f64 = (1..full)
        .filter(|m| m & observed_mask != 0)
        .map(|m| ss[0][m])
        .sum();

    let df_factors = |m: usize| -> f64 {
        level_counts
            .iter()
            .enumerate()
            .filter(|(i, _)| m >> i & 1 == 1)
            .map(|(_, &levels)| (levels - 1) as f64)
            .product()
    };

    let mut masks: Vec<usize> = (1..full).collect();
    masks.sort_by_key(|m| (m.count_ones(), *m));

    let mut rows = Vec::with_capacity(masks.len());
    for m in masks {
        let effect = factors
            .iter()
            .enumerate()
            .filter(|(i, _)| m >> i & 1 == 1)
            .map(|(_, f)| f.name())
            .collect::<Vec<_>>()
            .join(":");

        let df_num = df_factors(m);
        let df_den = df_num * (n_subjects - 1) as f64;
        let ss_effect = ss[0][m];
        let ss_error = ss[1][m];

        let ms_effect = ss_effect / df_num;
        let ms_error = ss_error / df_den;
        let f_value = if ms_error == 0.0 {
            if ms_effect == 0.0 { 0.0 } else { f64::INFINITY }
        } else {
            ms_effect / ms_error
        };

        let own_observed = if m & observed_mask != 0 { ss_effect } else { 0.0 };
        let denominator = ss_effect + error_sum + observed_sum - own_observed;
        let ges = ss_effect / denominator;

        rows.push(EffectRow {
            effect,
            df_num,
            df_den,
            f_value,
            ss: ss_effect,
            ss_error,
            ges,
        });
    }

    Ok(rows)
}
