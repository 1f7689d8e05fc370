//! Output Formatting
//!
//! Terminal-friendly rendering of the effect-size report: an aligned
//! effect table with degrees of freedom, F, ges, and confidence bounds,
//! followed by any precision warnings.

use crate::report::EffectSizeReport;

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &EffectSizeReport) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("Effect Sizes (generalized eta-squared)\n");
    output.push_str(&"=".repeat(72));
    output.push('\n');
    output.push_str(&format!(
        "subjects: {}  factors: {}  replicates: {}  interval: [{}, {}]  seed: {}\n\n",
        report.meta.subjects,
        report.meta.factors.join(", "),
        report.meta.replicates,
        report.meta.lower_tail,
        report.meta.upper_tail,
        report.meta.seed
    ));

    let name_width = report
        .effects
        .iter()
        .map(|row| row.effect.len())
        .max()
        .unwrap_or(6)
        .max(6);

    output.push_str(&format!(
        "{:<width$}  {:>7}  {:>7}  {:>10}  {:>8}  {:>8}  {:>8}\n",
        "effect",
        "df_num",
        "df_den",
        "F",
        "ges",
        "ci_low",
        "ci_high",
        width = name_width
    ));
    output.push_str(&"-".repeat(72));
    output.push('\n');

    for row in &report.effects {
        let f_value = row
            .f_value
            .map_or_else(|| "n/a".to_string(), |f| format!("{:.3}", f));
        output.push_str(&format!(
            "{:<width$}  {:>7}  {:>7}  {:>10}  {:>8.4}  {:>8.4}  {:>8.4}\n",
            row.effect,
            row.df_num,
            row.df_den,
            f_value,
            row.ges,
            row.ges_conf_low,
            row.ges_conf_high,
            width = name_width
        ));
    }

    if !report.warnings.is_empty() {
        output.push('\n');
        output.push_str("Warnings\n");
        output.push_str(&"-".repeat(72));
        output.push('\n');
        for warning in &report.warnings {
            output.push_str(&format!("  ! {}: {}\n", warning.effect, warning.detail));
        }
    }

    output
}
