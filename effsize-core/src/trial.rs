//! Raw Trial Observations

use serde::{Deserialize, Serialize};

/// One raw observation: a subject measured once in one condition cell.
///
/// `levels` holds one categorical level label per within-subject factor,
/// in the same order as the factor list passed to [`crate::aggregate`].
/// Repetitions of the same cell are distinguished by `repetition` and are
/// collapsed to their mean during aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    /// Subject identifier
    pub subject: String,
    /// Factor level labels, positional (one per factor)
    pub levels: Vec<String>,
    /// Repetition index within the cell
    pub repetition: u32,
    /// Continuous response value
    pub response: f64,
}

impl Trial {
    /// Convenience constructor used heavily in tests and examples
    pub fn new(
        subject: impl Into<String>,
        levels: &[impl AsRef<str>],
        repetition: u32,
        response: f64,
    ) -> Self {
        Self {
            subject: subject.into(),
            levels: levels.iter().map(|l| l.as_ref().to_string()).collect(),
            repetition,
            response,
        }
    }
}
