//! # Observation Masks
//!
//! The core data model of this crate: a boolean matrix recording which cells
//! of a data matrix are observed (`true`) versus missing (`false`). Datasets
//! in this domain are sparsely and irregularly observed — some cells are
//! structurally absent independent of any simulated train/test split — so the
//! observation pattern travels alongside the value matrix everywhere.
//!
//! Masks are immutable once constructed: every operation returns a freshly
//! allocated mask. Derived masks (test sets, training complements) are always
//! sub-masks of the reference mask they were generated from.

use itertools::iproduct;
use ndarray::{Array2, Zip};

/// A boolean observation pattern over a two-dimensional value matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationMask {
    cells: Array2<bool>,
}

impl ObservationMask {
    /// Wraps an existing boolean array as a mask.
    pub fn from_cells(cells: Array2<bool>) -> Self {
        Self { cells }
    }

    /// A mask with every cell observed.
    pub fn all_observed(shape: (usize, usize)) -> Self {
        Self {
            cells: Array2::from_elem(shape, true),
        }
    }

    /// A mask with no cell observed.
    pub fn unobserved(shape: (usize, usize)) -> Self {
        Self {
            cells: Array2::from_elem(shape, false),
        }
    }

    /// Builds a mask of the given shape with exactly the listed cells observed.
    ///
    /// Indices must lie within `shape`; duplicates are harmless.
    pub fn from_observed_indices(shape: (usize, usize), indices: &[(usize, usize)]) -> Self {
        let mut cells = Array2::from_elem(shape, false);
        for &(i, j) in indices {
            cells[[i, j]] = true;
        }
        Self { cells }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.cells.dim()
    }

    pub fn nrows(&self) -> usize {
        self.cells.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.cells.ncols()
    }

    pub fn is_observed(&self, row: usize, col: usize) -> bool {
        self.cells[[row, col]]
    }

    /// Number of observed cells.
    pub fn observed_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// All observed `(row, col)` pairs in row-major order.
    pub fn observed_indices(&self) -> Vec<(usize, usize)> {
        iproduct!(0..self.nrows(), 0..self.ncols())
            .filter(|&(i, j)| self.cells[[i, j]])
            .collect()
    }

    /// Observed-cell count per row.
    pub fn row_counts(&self) -> Vec<usize> {
        self.cells
            .rows()
            .into_iter()
            .map(|row| row.iter().filter(|&&c| c).count())
            .collect()
    }

    /// Observed-cell count per column.
    pub fn column_counts(&self) -> Vec<usize> {
        self.cells
            .columns()
            .into_iter()
            .map(|col| col.iter().filter(|&&c| c).count())
            .collect()
    }

    /// Cells observed in `self` but not in `other`.
    pub fn difference(&self, other: &Self) -> Self {
        assert_eq!(self.shape(), other.shape(), "mask shapes must match");
        Self {
            cells: Zip::from(&self.cells)
                .and(&other.cells)
                .map_collect(|&a, &b| a && !b),
        }
    }

    /// Cells observed in either mask.
    pub fn union(&self, other: &Self) -> Self {
        assert_eq!(self.shape(), other.shape(), "mask shapes must match");
        Self {
            cells: Zip::from(&self.cells)
                .and(&other.cells)
                .map_collect(|&a, &b| a || b),
        }
    }

    /// True if no cell is observed in both masks.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        assert_eq!(self.shape(), other.shape(), "mask shapes must match");
        Zip::from(&self.cells)
            .and(&other.cells)
            .all(|&a, &b| !(a && b))
    }

    /// True if every cell observed in `self` is also observed in `other`.
    pub fn is_submask_of(&self, other: &Self) -> bool {
        assert_eq!(self.shape(), other.shape(), "mask shapes must match");
        Zip::from(&self.cells)
            .and(&other.cells)
            .all(|&a, &b| !a || b)
    }

    /// The underlying boolean array, for consumers that index the value
    /// matrix directly (model trainers, metric modules).
    pub fn cells(&self) -> &Array2<bool> {
        &self.cells
    }
}
