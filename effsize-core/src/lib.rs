#![warn(missing_docs)]
//! Effsize Core - Experiment Data Model
//!
//! This crate provides the data model shared by the statistical engine:
//! - `Trial`: one raw observation of a subject in a condition cell
//! - `Factor` / `Design`: within-subject factors and the fully-crossed design
//! - `AggregatedData`: per-subject, per-cell mean responses as a dense matrix
//!
//! Trials are immutable input. Aggregation validates the full-crossing
//! invariant up front: every subject must have at least one trial in every
//! combination of factor levels, otherwise the repeated-measures mean
//! collapse is invalid and a `DataError::MissingCell` is raised before any
//! analysis is attempted.

mod aggregate;
mod design;
mod trial;

pub use aggregate::{AggregatedData, aggregate};
pub use design::{Design, Factor};
pub use trial::Trial;

use thiserror::Error;

/// Errors raised while validating or aggregating experiment data
#[derive(Debug, Clone, Error)]
pub enum DataError {
    /// No trials were supplied
    #[error("no trials supplied")]
    EmptyInput,

    /// No within-subject factors were named
    #[error("the within-subject factor list is empty")]
    NoFactors,

    /// A factor does not vary, so no effect can be estimated for it
    #[error("factor '{name}' has {levels} distinct level(s); at least 2 are required")]
    DegenerateFactor {
        /// Factor name
        name: String,
        /// Number of distinct levels observed
        levels: usize,
    },

    /// A trial carried the wrong number of factor levels
    #[error("trial for subject '{subject}' has {got} factor level(s), expected {expected}")]
    LevelArity {
        /// Subject identifier
        subject: String,
        /// Levels found on the trial
        got: usize,
        /// Levels required by the factor list
        expected: usize,
    },

    /// The design is not fully crossed
    #[error(
        "subject '{subject}' has no trials for cell [{cell}]; \
         repeated-measures aggregation requires a fully crossed design"
    )]
    MissingCell {
        /// Subject identifier
        subject: String,
        /// Human-readable cell description (factor=level pairs)
        cell: String,
    },

    /// A response value was NaN or infinite
    #[error("non-finite response {value} for subject '{subject}'")]
    NonFiniteResponse {
        /// Subject identifier
        subject: String,
        /// The offending value
        value: f64,
    },

    /// A named factor is not part of the design
    #[error("unknown factor '{name}'")]
    UnknownFactor {
        /// The unrecognized factor name
        name: String,
    },
}
