//! Report Data Structures

use chrono::{DateTime, Utc};
use effsize_stats::{EffectInterval, EffectRow, QuantileWarning};
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current report schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Complete effect-size report: the durable output of one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectSizeReport {
    /// Run metadata
    pub meta: ReportMeta,
    /// One merged row per effect, point estimate plus confidence bounds
    pub effects: Vec<EffectSummary>,
    /// Non-fatal precision warnings (degraded intervals, never a NaN)
    pub warnings: Vec<ReportWarning>,
}

/// Report metadata: what was analyzed and how
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Report schema version
    pub schema_version: u32,
    /// Library version that produced the report
    pub version: String,
    /// Report creation time (UTC)
    pub timestamp: DateTime<Utc>,
    /// Number of subjects in the original sample
    pub subjects: usize,
    /// Within-subject factor names, in report row order
    pub factors: Vec<String>,
    /// Bootstrap replicate count
    pub replicates: usize,
    /// Lower tail probability of the interval
    pub lower_tail: f64,
    /// Upper tail probability of the interval
    pub upper_tail: f64,
    /// Base RNG seed of the resampling
    pub seed: u64,
}

/// One effect's merged report row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSummary {
    /// Effect name (factor names joined with `:`)
    pub effect: String,
    /// Numerator degrees of freedom
    pub df_num: f64,
    /// Denominator degrees of freedom
    pub df_den: f64,
    /// F statistic; `None` when not finite (zero residual on noise-free
    /// data), keeping "unavailable" distinct from any numeric placeholder
    pub f_value: Option<f64>,
    /// Generalized eta-squared point estimate
    pub ges: f64,
    /// Lower bootstrap confidence bound for ges
    pub ges_conf_low: f64,
    /// Upper bootstrap confidence bound for ges
    pub ges_conf_high: f64,
}

/// Warning category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A tail quantile could not be resolved by the replicate count
    QuantileRange,
}

/// A non-fatal warning attached to the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportWarning {
    /// Warning category
    pub kind: WarningKind,
    /// Affected effect
    pub effect: String,
    /// Human-readable detail
    pub detail: String,
}

impl From<&QuantileWarning> for ReportWarning {
    fn from(warning: &QuantileWarning) -> Self {
        Self {
            kind: WarningKind::QuantileRange,
            effect: warning.effect.clone(),
            detail: format!(
                "tail probability {} unresolvable with {} replicates; bound clamped to observed extreme",
                warning.tail, warning.replicates
            ),
        }
    }
}

/// Errors while assembling a report
#[derive(Debug, Clone, Error)]
pub enum ReportError {
    /// A point-estimate effect has no matching confidence interval
    #[error("no confidence interval for effect '{effect}'")]
    MissingInterval {
        /// Affected effect name
        effect: String,
    },
}

/// Merge point-estimate rows with their bootstrap intervals into a report.
pub fn build_report(
    meta: ReportMeta,
    point: &[EffectRow],
    intervals: &[EffectInterval],
    warnings: &[QuantileWarning],
) -> Result<EffectSizeReport, ReportError> {
    let by_effect: FxHashMap<&str, &EffectInterval> = intervals
        .iter()
        .map(|interval| (interval.effect.as_str(), interval))
        .collect();

    let effects = point
        .iter()
        .map(|row| {
            let interval =
                by_effect
                    .get(row.effect.as_str())
                    .ok_or_else(|| ReportError::MissingInterval {
                        effect: row.effect.clone(),
                    })?;
            Ok(EffectSummary {
                effect: row.effect.clone(),
                df_num: row.df_num,
                df_den: row.df_den,
                f_value: row.f_value.is_finite().then_some(row.f_value),
                ges: row.ges,
                ges_conf_low: interval.lower,
                ges_conf_high: interval.upper,
            })
        })
        .collect::<Result<Vec<_>, ReportError>>()?;

    Ok(EffectSizeReport {
        meta,
        effects,
        warnings: warnings.iter().map(ReportWarning::from).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> ReportMeta {
        ReportMeta {
            schema_version: SCHEMA_VERSION,
            version: "0.1.0".to_string(),
            timestamp: Utc::now(),
            subjects: 6,
            factors: vec!["a".to_string()],
            replicates: 100,
            lower_tail: 0.025,
            upper_tail: 0.975,
            seed: 42,
        }
    }

    fn point_row(effect: &str, f_value: f64) -> EffectRow {
        EffectRow {
            effect: effect.to_string(),
            df_num: 1.0,
            df_den: 5.0,
            f_value,
            ss: 1.0,
            ss_error: 2.0,
            ges: 0.2,
        }
    }

    #[test]
    fn test_build_report_merges_intervals() {
        let point = vec![point_row("a", 4.2)];
        let intervals = vec![EffectInterval {
            effect: "a".to_string(),
            lower: 0.1,
            upper: 0.35,
        }];

        let report = build_report(meta(), &point, &intervals, &[]).unwrap();
        assert_eq!(report.effects.len(), 1);
        let row = &report.effects[0];
        assert_eq!(row.f_value, Some(4.2));
        assert!((row.ges_conf_low - 0.1).abs() < 1e-12);
        assert!((row.ges_conf_high - 0.35).abs() < 1e-12);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_non_finite_f_becomes_unavailable() {
        let point = vec![point_row("a", f64::INFINITY)];
        let intervals = vec![EffectInterval {
            effect: "a".to_string(),
            lower: 0.1,
            upper: 0.3,
        }];

        let report = build_report(meta(), &point, &intervals, &[]).unwrap();
        assert_eq!(report.effects[0].f_value, None);
    }

    #[test]
    fn test_missing_interval_rejected() {
        let point = vec![point_row("a", 1.0)];
        let err = build_report(meta(), &point, &[], &[]).unwrap_err();
        assert!(matches!(err, ReportError::MissingInterval { .. }));
    }

    #[test]
    fn test_warnings_carried_over() {
        let point = vec![point_row("a", 1.0)];
        let intervals = vec![EffectInterval {
            effect: "a".to_string(),
            lower: 0.0,
            upper: 0.5,
        }];
        let warnings = vec![QuantileWarning {
            effect: "a".to_string(),
            tail: 0.025,
            replicates: 20,
        }];

        let report = build_report(meta(), &point, &intervals, &warnings).unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind, WarningKind::QuantileRange);
        assert!(report.warnings[0].detail.contains("20 replicates"));
    }
}
