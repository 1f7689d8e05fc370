//! Trial Input
//!
//! Trials arrive as a JSON array of row objects:
//!
//! ```json
//! [
//!   { "subject": "p1",
//!     "factors": { "layout": 0, "size": "small" },
//!     "repetition": 0,
//!     "response": 31.7 }
//! ]
//! ```
//!
//! Factor levels may be JSON strings, numbers, or booleans; they are
//! treated as opaque categorical labels.

use effsize::Trial;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One input row as supplied by the data collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialRecord {
    /// Subject identifier
    pub subject: String,
    /// Factor name to level value
    #[serde(default)]
    pub factors: BTreeMap<String, Value>,
    /// Repetition index within the cell
    #[serde(default)]
    pub repetition: u32,
    /// Continuous response value
    pub response: f64,
}

/// Input reading/validation errors
#[derive(Debug, Error)]
pub enum InputError {
    /// The input file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Input path
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The input is not a valid JSON array of trial rows
    #[error("failed to parse trials: {0}")]
    Json(#[from] serde_json::Error),

    /// A row lacks a level for a configured factor
    #[error("trial {index} for subject '{subject}' is missing factor '{factor}'")]
    MissingFactor {
        /// Row index in the input array
        index: usize,
        /// Subject identifier
        subject: String,
        /// Missing factor name
        factor: String,
    },

    /// A level value is neither string, number, nor boolean
    #[error("trial {index}: factor '{factor}' has an unsupported level type")]
    BadLevel {
        /// Row index in the input array
        index: usize,
        /// Offending factor name
        factor: String,
    },
}

/// Read and convert trials from a JSON file
pub fn read_trials(path: &Path, factors: &[String]) -> Result<Vec<Trial>, InputError> {
    let text = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_trials(&text, factors)
}

/// Parse trials from JSON text, positionalizing levels per `factors`
pub fn parse_trials(text: &str, factors: &[String]) -> Result<Vec<Trial>, InputError> {
    let records: Vec<TrialRecord> = serde_json::from_str(text)?;

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let levels = factors
                .iter()
                .map(|factor| {
                    let value =
                        record
                            .factors
                            .get(factor)
                            .ok_or_else(|| InputError::MissingFactor {
                                index,
                                subject: record.subject.clone(),
                                factor: factor.clone(),
                            })?;
                    level_label(value).ok_or_else(|| InputError::BadLevel {
                        index,
                        factor: factor.clone(),
                    })
                })
                .collect::<Result<Vec<String>, InputError>>()?;

            Ok(Trial {
                subject: record.subject.clone(),
                levels,
                repetition: record.repetition,
                response: record.response,
            })
        })
        .collect()
}

fn level_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factors(list: &[&str]) -> Vec<String> {
        list.iter().map(|f| (*f).to_string()).collect()
    }

    #[test]
    fn test_parses_rows_positionally() {
        let text = r#"[
            { "subject": "p1",
              "factors": { "layout": 0, "size": "small" },
              "repetition": 0,
              "response": 31.5 },
            { "subject": "p1",
              "factors": { "size": "large", "layout": 1 },
              "repetition": 1,
              "response": 29.0 }
        ]"#;

        let trials = parse_trials(text, &factors(&["layout", "size"])).unwrap();
        assert_eq!(trials.len(), 2);
        assert_eq!(trials[0].levels, vec!["0", "small"]);
        assert_eq!(trials[1].levels, vec!["1", "large"]);
        assert_eq!(trials[1].repetition, 1);
    }

    #[test]
    fn test_missing_factor_rejected() {
        let text = r#"[
            { "subject": "p1", "factors": { "layout": 0 }, "response": 1.0 }
        ]"#;
        let err = parse_trials(text, &factors(&["layout", "size"])).unwrap_err();
        assert!(matches!(
            err,
            InputError::MissingFactor { index: 0, ref factor, .. } if factor == "size"
        ));
    }

    #[test]
    fn test_unsupported_level_type_rejected() {
        let text = r#"[
            { "subject": "p1", "factors": { "layout": [1, 2] }, "response": 1.0 }
        ]"#;
        let err = parse_trials(text, &factors(&["layout"])).unwrap_err();
        assert!(matches!(err, InputError::BadLevel { .. }));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = parse_trials("not json", &factors(&["layout"])).unwrap_err();
        assert!(matches!(err, InputError::Json(_)));
    }
}
