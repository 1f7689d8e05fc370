//! CSV Output
//!
//! One row per effect with the report columns. Effect names may contain
//! `:` but never commas or quotes, so no escaping is needed.

use crate::report::EffectSizeReport;

/// Generate a CSV rendition of the effect table.
pub fn generate_csv_report(report: &EffectSizeReport) -> String {
    let mut out = String::new();
    out.push_str("effect,df_num,df_den,f_value,ges,ges_conf_low,ges_conf_high\n");

    for row in &report.effects {
        let f_value = row
            .f_value
            .map_or_else(|| "n/a".to_string(), |f| format!("{:.6}", f));
        out.push_str(&format!(
            "{},{},{},{},{:.6},{:.6},{:.6}\n",
            row.effect, row.df_num, row.df_den, f_value, row.ges, row.ges_conf_low, row.ges_conf_high
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{EffectSizeReport, EffectSummary, ReportMeta, SCHEMA_VERSION};
    use chrono::Utc;

    #[test]
    fn test_csv_header_and_rows() {
        let report = EffectSizeReport {
            meta: ReportMeta {
                schema_version: SCHEMA_VERSION,
                version: "0.1.0".to_string(),
                timestamp: Utc::now(),
                subjects: 6,
                factors: vec!["layout".to_string()],
                replicates: 100,
                lower_tail: 0.025,
                upper_tail: 0.975,
                seed: 42,
            },
            effects: vec![
                EffectSummary {
                    effect: "layout".to_string(),
                    df_num: 1.0,
                    df_den: 5.0,
                    f_value: Some(12.0),
                    ges: 0.375,
                    ges_conf_low: 0.2,
                    ges_conf_high: 0.5,
                },
                EffectSummary {
                    effect: "layout:size".to_string(),
                    df_num: 2.0,
                    df_den: 10.0,
                    f_value: None,
                    ges: 0.1,
                    ges_conf_low: 0.05,
                    ges_conf_high: 0.2,
                },
            ],
            warnings: Vec::new(),
        };

        let csv = generate_csv_report(&report);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("effect,df_num"));
        assert!(lines[1].starts_with("layout,1,5,12.000000,0.375000"));
        assert!(lines[2].starts_with("layout:size,2,10,n/a"));
    }
}
