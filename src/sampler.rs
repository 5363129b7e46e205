//! Uniform random mask sampling.
//!
//! Pure functions of an explicit random source and their inputs: every caller
//! threads its own `rand::Rng`, so independent generation units can run with
//! independently seeded generators and a fixed seed reproduces the exact
//! sequence of draws.

use rand::Rng;
use rand::seq::index;

use crate::mask::ObservationMask;

/// Number of test cells for a target missingness fraction over a population
/// of observed cells. Plain round-half-away-from-zero, so the test size is
/// exact rather than approximate.
pub fn fraction_to_count(fraction: f64, population: usize) -> usize {
    (fraction * population as f64).round() as usize
}

/// A fresh mask of the given shape with exactly `observed` cells set,
/// chosen uniformly without replacement from all `I*J` cells.
pub fn sample_mask<R: Rng + ?Sized>(
    rng: &mut R,
    shape: (usize, usize),
    observed: usize,
) -> ObservationMask {
    let (rows, cols) = shape;
    let total = rows * cols;
    assert!(observed <= total, "cannot observe {observed} of {total} cells");
    let indices: Vec<(usize, usize)> = index::sample(rng, total, observed)
        .into_iter()
        .map(|flat| (flat / cols, flat % cols))
        .collect();
    ObservationMask::from_observed_indices(shape, &indices)
}

/// A sub-mask of `reference` with exactly `observed` cells set, chosen
/// uniformly without replacement from the reference's observed-cell set.
pub fn sample_submask<R: Rng + ?Sized>(
    rng: &mut R,
    reference: &ObservationMask,
    observed: usize,
) -> ObservationMask {
    sample_from_cells(rng, reference.shape(), &reference.observed_indices(), observed)
}

/// Sampling core shared with the split generator, which pre-computes the
/// eligible cell list once per retry loop instead of per attempt.
pub(crate) fn sample_from_cells<R: Rng + ?Sized>(
    rng: &mut R,
    shape: (usize, usize),
    eligible: &[(usize, usize)],
    observed: usize,
) -> ObservationMask {
    assert!(
        observed <= eligible.len(),
        "cannot observe {observed} of {} eligible cells",
        eligible.len()
    );
    let picked: Vec<(usize, usize)> = index::sample(rng, eligible.len(), observed)
        .into_iter()
        .map(|k| eligible[k])
        .collect();
    ObservationMask::from_observed_indices(shape, &picked)
}
