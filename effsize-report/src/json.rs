//! JSON Output

use crate::report::EffectSizeReport;

/// Generate a prettified JSON report.
///
/// All report fields are finite (unavailable statistics are `null`), so
/// serialization cannot fail on non-finite numbers.
pub fn generate_json_report(report: &EffectSizeReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
