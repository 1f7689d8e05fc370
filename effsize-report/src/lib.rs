#![warn(missing_docs)]
//! Effsize Report - Effect-Size Report Output
//!
//! The Effect-Size Report is the sole durable output of an analysis:
//! one row per effect with F, degrees of freedom, generalized eta-squared,
//! and the bootstrap confidence bounds, plus run metadata and any
//! precision warnings. Output formats:
//! - JSON (machine-readable, pretty-printed)
//! - CSV (spreadsheet-compatible)
//! - Human-readable terminal table

mod csv;
mod json;
mod report;
mod table;

pub use csv::generate_csv_report;
pub use json::generate_json_report;
pub use report::{
    EffectSizeReport, EffectSummary, ReportError, ReportMeta, ReportWarning, SCHEMA_VERSION,
    WarningKind, build_report,
};
pub use table::format_human_output;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON with full schema
    Json,
    /// CSV for spreadsheets
    Csv,
    /// Human-readable terminal output
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
