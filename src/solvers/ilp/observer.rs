//! ILP Observer
//!
//! Hooks for capturing the integer programme as it is built, before it is handed
//! to the solver. Useful for rendering the formulation or asserting on it in tests.

use crate::items::{Food, Item};

/// Receives callbacks while an ILP formulation is being constructed.
pub trait ILPObserver {
    /// Called once per decision variable `x_index`, bounded to `0..=upper`.
    fn on_item_variable(&mut self, index: usize, item: Item<'_>, upper: u32);

    /// Called with the objective coefficient (price in minor units) of `x_index`.
    fn on_objective_term(&mut self, _index: usize, _minor_units: i64) {}

    /// Called once per wanted food with its coverage constraint.
    ///
    /// `terms` pairs a variable index with how many of `food` it contributes; the
    /// constraint is `Σ coeff · x_index ≥ wanted`.
    fn on_coverage_constraint(&mut self, food: &Food, terms: &[(usize, u32)], wanted: u32);
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ILPObserver for NoopObserver {
    fn on_item_variable(&mut self, _index: usize, _item: Item<'_>, _upper: u32) {}

    fn on_coverage_constraint(&mut self, _food: &Food, _terms: &[(usize, u32)], _wanted: u32) {}
}
