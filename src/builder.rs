//! Experiment-level orchestration of split generation.
//!
//! An experiment run asks for a heterogeneous batch of splits: a k-fold
//! cross-validation pass, or a sweep over test fractions with several
//! independent repeats per fraction, or both. The builder expands the
//! requested plans into independent generation units, runs each unit on its
//! own deterministically seeded generator, and returns the accepted splits in
//! plan order (fold-index order within a fold plan, fraction-then-repeat order
//! within a fraction plan) — downstream aggregation indexes results
//! positionally.
//!
//! Units share no mutable state, so `par_build` runs them on the rayon pool
//! and still yields output bitwise identical to the sequential `build`.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::error::MaskError;
use crate::mask::ObservationMask;
use crate::split::{self, TrainTestSplit};

/// One requested batch of splits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SplitPlan {
    /// A full k-fold cross-validation partition.
    Folds { no_folds: usize, max_attempts: usize },
    /// `repeats` independent train/test splits at one test fraction.
    Fraction {
        fraction: f64,
        repeats: usize,
        max_attempts: usize,
    },
}

/// Assembles the complete ordered collection of train/test splits for an
/// experiment run.
#[derive(Debug, Clone)]
pub struct FoldSetBuilder {
    seed: u64,
    plans: Vec<SplitPlan>,
}

/// Smallest independently retried generation step: a whole fold partition
/// (regenerated as a unit on invalidity) or a single fraction repeat.
#[derive(Debug, Clone, Copy)]
enum Unit {
    FoldSet { no_folds: usize, max_attempts: usize },
    FractionRepeat { fraction: f64, max_attempts: usize },
}

impl FoldSetBuilder {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            plans: Vec::new(),
        }
    }

    /// Appends a k-fold cross-validation plan.
    pub fn folds(self, no_folds: usize, max_attempts: usize) -> Self {
        self.plan(SplitPlan::Folds {
            no_folds,
            max_attempts,
        })
    }

    /// Appends a fraction-sweep plan with independent repeats.
    pub fn fraction(self, fraction: f64, repeats: usize, max_attempts: usize) -> Self {
        self.plan(SplitPlan::Fraction {
            fraction,
            repeats,
            max_attempts,
        })
    }

    pub fn plan(mut self, plan: SplitPlan) -> Self {
        self.plans.push(plan);
        self
    }

    /// Runs every plan sequentially against `reference`.
    pub fn build(&self, reference: &ObservationMask) -> Result<Vec<TrainTestSplit>, MaskError> {
        let units = self.units();
        log::info!(
            "generating {} split unit(s) from {} plan(s)",
            units.len(),
            self.plans.len()
        );
        let batches: Vec<Vec<TrainTestSplit>> = units
            .iter()
            .map(|&(seed, unit)| run_unit(reference, seed, unit))
            .collect::<Result<_, _>>()?;
        Ok(batches.into_iter().flatten().collect())
    }

    /// Runs every plan on the rayon pool. Output is identical to `build`:
    /// each unit owns a generator seeded from the builder seed and the unit
    /// index, and the order-preserving collect keeps plan order.
    pub fn par_build(&self, reference: &ObservationMask) -> Result<Vec<TrainTestSplit>, MaskError> {
        let units = self.units();
        log::info!(
            "generating {} split unit(s) from {} plan(s) in parallel",
            units.len(),
            self.plans.len()
        );
        let batches: Vec<Vec<TrainTestSplit>> = units
            .par_iter()
            .map(|&(seed, unit)| run_unit(reference, seed, unit))
            .collect::<Result<_, _>>()?;
        Ok(batches.into_iter().flatten().collect())
    }

    /// Expands plans into `(unit_seed, unit)` pairs in plan order.
    fn units(&self) -> Vec<(u64, Unit)> {
        let mut units = Vec::new();
        for plan in &self.plans {
            match *plan {
                SplitPlan::Folds {
                    no_folds,
                    max_attempts,
                } => units.push(Unit::FoldSet {
                    no_folds,
                    max_attempts,
                }),
                SplitPlan::Fraction {
                    fraction,
                    repeats,
                    max_attempts,
                } => {
                    for _ in 0..repeats {
                        units.push(Unit::FractionRepeat {
                            fraction,
                            max_attempts,
                        });
                    }
                }
            }
        }
        units
            .into_iter()
            .enumerate()
            .map(|(index, unit)| (unit_seed(self.seed, index as u64), unit))
            .collect()
    }
}

/// Per-unit generator seed: the builder seed mixed with the unit index by a
/// 64-bit golden-ratio multiply, so adjacent units get unrelated streams.
fn unit_seed(base: u64, index: u64) -> u64 {
    base ^ index.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn run_unit(
    reference: &ObservationMask,
    seed: u64,
    unit: Unit,
) -> Result<Vec<TrainTestSplit>, MaskError> {
    let mut rng = StdRng::seed_from_u64(seed);
    match unit {
        Unit::FoldSet {
            no_folds,
            max_attempts,
        } => split::generate_fold_splits(&mut rng, reference, no_folds, max_attempts),
        Unit::FractionRepeat {
            fraction,
            max_attempts,
        } => split::generate_fraction_split(&mut rng, reference, fraction, max_attempts)
            .map(|split| vec![split]),
    }
}
