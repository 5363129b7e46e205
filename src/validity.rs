//! Structural validity of training masks.
//!
//! A mask used as a training set must leave no row and no column fully
//! unobserved: a row or column with zero training observations makes the
//! corresponding entity's parameters inestimable downstream. The check is
//! purely structural and never inspects data values.

use crate::error::MaskError;
use crate::mask::ObservationMask;

/// True iff every row and every column of `mask` has at least one
/// observed cell.
pub fn is_valid_training_mask(mask: &ObservationMask) -> bool {
    mask.row_counts().iter().all(|&c| c > 0) && mask.column_counts().iter().all(|&c| c > 0)
}

/// Fail-fast precondition check on a reference mask, reporting the first
/// fully unobserved row or column. Split generation refuses to sample from a
/// reference that is already invalid.
pub fn check_reference(mask: &ObservationMask) -> Result<(), MaskError> {
    if let Some(row) = mask.row_counts().iter().position(|&c| c == 0) {
        return Err(MaskError::EmptyReferenceRow(row));
    }
    if let Some(col) = mask.column_counts().iter().position(|&c| c == 0) {
        return Err(MaskError::EmptyReferenceColumn(col));
    }
    Ok(())
}
