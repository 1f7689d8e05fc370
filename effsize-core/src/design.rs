//! Factors and the Fully-Crossed Design
//!
//! A `Design` captures the within-subject factor list (with their discovered
//! level sets) and the subject roster. Condition cells are the cross product
//! of factor levels, addressed by a mixed-radix index: the first factor is
//! the fastest-varying digit.

use crate::{DataError, Trial};
use fxhash::FxHashSet;

/// A named within-subject factor with its ordered level set.
///
/// Levels are recorded in first-appearance order from the trial stream, so
/// the level ordering of the input data is preserved in reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factor {
    name: String,
    levels: Vec<String>,
}

impl Factor {
    /// Factor name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered level labels
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Number of levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}

/// The fully-crossed within-subject design: factors plus subject roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Design {
    factors: Vec<Factor>,
    subjects: Vec<String>,
}

impl Design {
    /// Discover the design from raw trials.
    ///
    /// Factor levels and subjects are collected in first-appearance order.
    /// Fails if the trial stream is empty, the factor list is empty, any
    /// trial carries the wrong number of levels, or any factor ends up with
    /// fewer than 2 distinct levels.
    pub fn from_trials(factor_names: &[String], trials: &[Trial]) -> Result<Self, DataError> {
        if trials.is_empty() {
            return Err(DataError::EmptyInput);
        }
        if factor_names.is_empty() {
            return Err(DataError::NoFactors);
        }

        let mut factors: Vec<Factor> = factor_names
            .iter()
            .map(|name| Factor {
                name: name.clone(),
                levels: Vec::new(),
            })
            .collect();
        let mut subjects: Vec<String> = Vec::new();
        let mut seen_subjects: FxHashSet<String> = FxHashSet::default();

        for trial in trials {
            if trial.levels.len() != factors.len() {
                return Err(DataError::LevelArity {
                    subject: trial.subject.clone(),
                    got: trial.levels.len(),
                    expected: factors.len(),
                });
            }
            if !trial.response.is_finite() {
                return Err(DataError::NonFiniteResponse {
                    subject: trial.subject.clone(),
                    value: trial.response,
                });
            }
            for (factor, level) in factors.iter_mut().zip(&trial.levels) {
                if !factor.levels.contains(level) {
                    factor.levels.push(level.clone());
                }
            }
            if seen_subjects.insert(trial.subject.clone()) {
                subjects.push(trial.subject.clone());
            }
        }

        for factor in &factors {
            if factor.level_count() < 2 {
                return Err(DataError::DegenerateFactor {
                    name: factor.name.clone(),
                    levels: factor.level_count(),
                });
            }
        }

        Ok(Self { factors, subjects })
    }

    /// The within-subject factors, in declaration order
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    /// Subject identifiers, in first-appearance order
    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    /// Number of subjects
    pub fn subject_count(&self) -> usize {
        self.subjects.len()
    }

    /// Total number of condition cells (product of level counts)
    pub fn cell_count(&self) -> usize {
        self.factors.iter().map(Factor::level_count).product()
    }

    /// Mixed-radix cell index for one level index per factor.
    ///
    /// The first factor is the fastest-varying digit.
    pub fn cell_index(&self, level_indices: &[usize]) -> usize {
        debug_assert_eq!(level_indices.len(), self.factors.len());
        let mut index = 0;
        let mut radix = 1;
        for (factor, &level) in self.factors.iter().zip(level_indices) {
            debug_assert!(level < factor.level_count());
            index += level * radix;
            radix *= factor.level_count();
        }
        index
    }

    /// Decode a cell index back into one level index per factor
    pub fn cell_levels(&self, mut cell: usize) -> Vec<usize> {
        let mut levels = Vec::with_capacity(self.factors.len());
        for factor in &self.factors {
            levels.push(cell % factor.level_count());
            cell /= factor.level_count();
        }
        levels
    }

    /// Human-readable cell description, e.g. `layout=1, size=2`
    pub fn cell_label(&self, cell: usize) -> String {
        let levels = self.cell_levels(cell);
        self.factors
            .iter()
            .zip(levels)
            .map(|(factor, level)| format!("{}={}", factor.name, factor.levels[level]))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factor_names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn test_discovers_levels_in_first_appearance_order() {
        let trials = vec![
            Trial::new("s1", &["b", "x"], 0, 1.0),
            Trial::new("s1", &["a", "x"], 0, 2.0),
            Trial::new("s1", &["b", "y"], 0, 3.0),
            Trial::new("s1", &["a", "y"], 0, 4.0),
        ];
        let design = Design::from_trials(&factor_names(&["f1", "f2"]), &trials).unwrap();

        assert_eq!(design.factors()[0].levels(), &["b", "a"]);
        assert_eq!(design.factors()[1].levels(), &["x", "y"]);
        assert_eq!(design.cell_count(), 4);
        assert_eq!(design.subject_count(), 1);
    }

    #[test]
    fn test_subjects_deduplicated_in_first_appearance_order() {
        let trials = vec![
            Trial::new("s2", &["a"], 0, 1.0),
            Trial::new("s1", &["a"], 0, 2.0),
            Trial::new("s2", &["b"], 0, 3.0),
            Trial::new("s1", &["b"], 0, 4.0),
        ];
        let design = Design::from_trials(&factor_names(&["f1"]), &trials).unwrap();
        assert_eq!(design.subjects(), &["s2", "s1"]);
    }

    #[test]
    fn test_cell_index_round_trips() {
        let trials = vec![
            Trial::new("s1", &["0", "0"], 0, 1.0),
            Trial::new("s1", &["1", "0"], 0, 1.0),
            Trial::new("s1", &["0", "1"], 0, 1.0),
            Trial::new("s1", &["1", "1"], 0, 1.0),
            Trial::new("s1", &["0", "2"], 0, 1.0),
            Trial::new("s1", &["1", "2"], 0, 1.0),
        ];
        let design = Design::from_trials(&factor_names(&["a", "b"]), &trials).unwrap();

        for cell in 0..design.cell_count() {
            let levels = design.cell_levels(cell);
            assert_eq!(design.cell_index(&levels), cell);
        }
    }

    #[test]
    fn test_degenerate_factor_rejected() {
        let trials = vec![
            Trial::new("s1", &["only", "x"], 0, 1.0),
            Trial::new("s1", &["only", "y"], 0, 2.0),
        ];
        let err = Design::from_trials(&factor_names(&["f1", "f2"]), &trials).unwrap_err();
        assert!(matches!(
            err,
            DataError::DegenerateFactor { ref name, levels: 1 } if name == "f1"
        ));
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = Design::from_trials(&factor_names(&["f1"]), &[]).unwrap_err();
        assert!(matches!(err, DataError::EmptyInput));
    }

    #[test]
    fn test_no_factors_rejected() {
        let no_levels: [&str; 0] = [];
        let trials = vec![Trial::new("s1", &no_levels, 0, 1.0)];
        let err = Design::from_trials(&[], &trials).unwrap_err();
        assert!(matches!(err, DataError::NoFactors));
    }

    #[test]
    fn test_level_arity_rejected() {
        let trials = vec![Trial::new("s1", &["a"], 0, 1.0)];
        let err = Design::from_trials(&factor_names(&["f1", "f2"]), &trials).unwrap_err();
        assert!(matches!(err, DataError::LevelArity { got: 1, expected: 2, .. }));
    }

    #[test]
    fn test_non_finite_response_rejected() {
        let trials = vec![Trial::new("s1", &["a"], 0, f64::NAN)];
        let err = Design::from_trials(&factor_names(&["f1"]), &trials).unwrap_err();
        assert!(matches!(err, DataError::NonFiniteResponse { .. }));
    }
}
