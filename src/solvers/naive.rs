//! Naive Solver

use crate::{items::Item, solvers::OrderMaker};

/// Orders exactly what was asked for; the price every other strategy must beat.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveSolver;

impl<'c> OrderMaker<'c> for NaiveSolver {
    fn name(&self) -> &'static str {
        "naive"
    }

    fn order(&self, wanted: &[Item<'c>]) -> Vec<Item<'c>> {
        wanted.to_vec()
    }
}
