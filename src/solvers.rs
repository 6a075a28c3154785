//! Solvers for meal-combo orders
//!
//! Every strategy implements [`OrderMaker`]: given the wanted items it returns an
//! order whose foods cover the wanted foods, priced as low as the strategy can find.

use std::time::Duration;

use clap::{Args, ValueEnum};

use crate::{catalog::Catalog, items::Item};

pub mod greedy;
pub mod ilp;
pub mod naive;
pub mod search;

pub use greedy::GreedySolver;
pub use ilp::{ILPSolver, SolverError};
pub use naive::NaiveSolver;
pub use search::TreeSearchSolver;

/// Default wall-clock budget for the ILP strategy, in milliseconds
pub const DEFAULT_TIME_LIMIT_MS: u64 = 60_000;

/// Trait for turning a wanted list into a priced order
pub trait OrderMaker<'c> {
    /// Short strategy name, used in logs and receipts.
    fn name(&self) -> &'static str;

    /// Produce an order covering every food in `wanted`.
    ///
    /// Meals in `wanted` are expanded to their foods first. Strategies never fail on
    /// items from their own catalog; internal failures degrade to a greedy order.
    fn order(&self, wanted: &[Item<'c>]) -> Vec<Item<'c>>;
}

/// Strategy tuning knobs.
#[derive(Debug, Clone, Args)]
pub struct SolverConfig {
    /// Wall-clock budget for the ILP strategy, in milliseconds
    #[arg(
        long,
        env = "COMBO_TIME_LIMIT_MS",
        default_value_t = DEFAULT_TIME_LIMIT_MS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub time_limit_ms: u64,
}

impl SolverConfig {
    /// The ILP time limit as a [`Duration`].
    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms.max(1))
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: DEFAULT_TIME_LIMIT_MS,
        }
    }
}

/// Selectable optimisation strategy
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Order exactly what was asked for
    Naive,

    /// Repeatedly take the meal with the largest savings
    Greedy,

    /// Exhaustive search over meal combinations
    Search,

    /// Integer linear programme, falling back to greedy on timeout
    Ilp,
}

impl Strategy {
    /// Build the strategy over `catalog`.
    pub fn build<'c>(
        self,
        catalog: &'c Catalog,
        config: &SolverConfig,
    ) -> Box<dyn OrderMaker<'c> + 'c> {
        match self {
            Strategy::Naive => Box::new(NaiveSolver),
            Strategy::Greedy => Box::new(GreedySolver::new(catalog)),
            Strategy::Search => Box::new(TreeSearchSolver::new(catalog)),
            Strategy::Ilp => Box::new(ILPSolver::new(catalog, config)),
        }
    }
}
