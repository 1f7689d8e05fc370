//! Aggregation to Per-Subject Cell Means
//!
//! Collapses repeated trials to one mean per subject x condition cell,
//! stored as a dense subjects x cells matrix. The dense layout makes the
//! full-crossing invariant structural: a missing (subject, cell) is caught
//! here, before any variance decomposition, and resampling whole rows can
//! never break balance.

use crate::{DataError, Design, Trial};
use fxhash::FxHashMap;

/// Aggregated observations: one mean response per subject per cell.
///
/// Row-major by subject; `value(s, c)` is subject `s`'s mean in cell `c`.
/// Ephemeral by design: recomputed per analysis and per bootstrap replicate,
/// never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedData {
    design: Design,
    values: Vec<f64>,
}

/// Aggregate raw trials into per-subject cell means.
///
/// Validates the design (via [`Design::from_trials`]) and the full-crossing
/// invariant: every subject must have at least one trial in every cell.
pub fn aggregate(factor_names: &[String], trials: &[Trial]) -> Result<AggregatedData, DataError> {
    let design = Design::from_trials(factor_names, trials)?;
    let n_subjects = design.subject_count();
    let n_cells = design.cell_count();

    let mut sums = vec![0.0_f64; n_subjects * n_cells];
    let mut counts = vec![0_u32; n_subjects * n_cells];

    // Index lookups; every subject and level was registered by from_trials.
    let subject_index: FxHashMap<&str, usize> = design
        .subjects()
        .iter()
        .enumerate()
        .map(|(i, s)| (s.as_str(), i))
        .collect();
    let level_index: Vec<FxHashMap<&str, usize>> = design
        .factors()
        .iter()
        .map(|factor| {
            factor
                .levels()
                .iter()
                .enumerate()
                .map(|(i, l)| (l.as_str(), i))
                .collect()
        })
        .collect();

    let mut levels = vec![0_usize; design.factors().len()];
    for trial in trials {
        let subject = subject_index[trial.subject.as_str()];
        for (slot, (lookup, level)) in levels.iter_mut().zip(level_index.iter().zip(&trial.levels))
        {
            *slot = lookup[level.as_str()];
        }
        let cell = design.cell_index(&levels);
        sums[subject * n_cells + cell] += trial.response;
        counts[subject * n_cells + cell] += 1;
    }

    let mut values = vec![0.0_f64; n_subjects * n_cells];
    for subject in 0..n_subjects {
        for cell in 0..n_cells {
            let idx = subject * n_cells + cell;
            if counts[idx] == 0 {
                return Err(DataError::MissingCell {
                    subject: design.subjects()[subject].clone(),
                    cell: design.cell_label(cell),
                });
            }
            values[idx] = sums[idx] / f64::from(counts[idx]);
        }
    }

    Ok(AggregatedData { design, values })
}

impl AggregatedData {
    /// The validated design behind this matrix
    pub fn design(&self) -> &Design {
        &self.design
    }

    /// Number of subjects (matrix rows)
    pub fn subject_count(&self) -> usize {
        self.design.subject_count()
    }

    /// Number of condition cells (matrix columns)
    pub fn cell_count(&self) -> usize {
        self.design.cell_count()
    }

    /// One subject's mean responses across all cells
    pub fn row(&self, subject: usize) -> &[f64] {
        let n_cells = self.cell_count();
        &self.values[subject * n_cells..(subject + 1) * n_cells]
    }

    /// Mean response for one subject in one cell
    pub fn value(&self, subject: usize, cell: usize) -> f64 {
        self.values[subject * self.cell_count() + cell]
    }

    /// All values, row-major by subject
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Build a bootstrap sample by copying whole subject rows.
    ///
    /// `draws[i]` is the original subject whose complete cell set becomes
    /// synthetic subject `i`. Drawing the same original twice yields two
    /// independent synthetic subjects (identity is the row position), so
    /// full crossing is preserved and no cross-subject mixing can occur.
    pub fn resampled(&self, draws: &[usize]) -> AggregatedData {
        debug_assert_eq!(draws.len(), self.subject_count());
        let n_cells = self.cell_count();
        let mut values = Vec::with_capacity(draws.len() * n_cells);
        for &draw in draws {
            values.extend_from_slice(self.row(draw));
        }
        AggregatedData {
            design: self.design.clone(),
            values,
        }
    }
}
