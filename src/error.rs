//! Error taxonomy for mask generation.
//!
//! Two families: invalid configurations are rejected before any sampling
//! attempt, and attempt exhaustion is reported with the configuration that
//! failed so orchestration can log which setting is infeasible for a given
//! dataset's sparsity. Nothing is auto-corrected; a degraded or partially
//! valid mask is never returned.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaskError {
    #[error("test fraction must lie strictly between 0 and 1, got {0}")]
    FractionOutOfRange(f64),

    #[error("cross-validation needs at least 2 folds, got {0}")]
    TooFewFolds(usize),

    #[error("attempt budget must be at least 1")]
    NoAttemptBudget,

    #[error("reference mask row {0} has no observed cells")]
    EmptyReferenceRow(usize),

    #[error("reference mask column {0} has no observed cells")]
    EmptyReferenceColumn(usize),

    #[error(
        "no valid train/test split found for fraction {fraction} within {attempts} attempts; \
         the reference mask is likely too sparse for this fraction"
    )]
    FractionAttemptsExhausted { fraction: f64, attempts: usize },

    #[error("no valid {no_folds}-fold partition found within {attempts} attempts")]
    FoldAttemptsExhausted { no_folds: usize, attempts: usize },
}
