//! ILP Solver
//!
//! Formulates the order as an integer linear programme over the catalog items related
//! to the wanted foods:
//!
//! - one integer variable `x_i ∈ [0, |wanted foods|]` per related item,
//! - objective `min Σ price_i · x_i` with prices in minor units,
//! - one coverage constraint per wanted food `f`:
//!   `x_f + Σ_m count(f in m) · x_m ≥ wanted(f)`.
//!
//! The model is solved on a worker thread so the caller can stop waiting after the
//! configured time limit; on timeout or failure the greedy order is returned instead.
//! With the `solver-highs` feature the limit is also handed to HiGHS so an overrunning
//! worker stops on its own.

use std::{
    io, iter,
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::Duration,
};

#[cfg(feature = "solver-highs")]
use good_lp::WithTimeLimit;
use good_lp::{Expression, ProblemVariables, Solution, SolverModel, Variable, variable};
use num_traits::ToPrimitive;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[cfg(feature = "solver-highs")]
use good_lp::solvers::highs::highs as default_solver;
#[cfg(all(not(feature = "solver-highs"), feature = "solver-microlp"))]
use good_lp::solvers::microlp::microlp as default_solver;

use crate::{
    catalog::Catalog,
    items::Item,
    order::{count, covers, expand},
    solvers::{GreedySolver, OrderMaker, SolverConfig},
};

pub mod observer;

pub use observer::{ILPObserver, NoopObserver};

/// Errors raised while formulating or solving the integer programme.
///
/// These never escape [`OrderMaker::order`]; they are logged and the greedy order
/// is returned in their place.
#[derive(Debug, Error)]
pub enum SolverError {
    /// Money amount in minor units cannot be represented exactly as a solver coefficient.
    #[error(
        "money amount in minor units cannot be represented exactly as a solver coefficient: {0}"
    )]
    MinorUnitsNotRepresentable(i64),

    /// Wanted list is too long to bound a solver variable
    #[error("too many wanted foods for the solver: {0}")]
    TooManyFoods(usize),

    /// Wrapped solver resolution error
    #[error(transparent)]
    ResolutionError(#[from] good_lp::ResolutionError),

    /// Internal solver invariant was violated (this is a bug).
    #[error("solver invariant violated: {message}")]
    InvariantViolation {
        /// What invariant was violated
        message: &'static str,
    },

    /// No solution within the time limit
    #[error("solver did not finish within {limit:?}")]
    TimedOut {
        /// The limit that was exceeded
        limit: Duration,
    },

    /// The worker thread could not be started
    #[error("failed to spawn solver thread: {0}")]
    WorkerSpawn(#[from] io::Error),

    /// The worker thread exited without sending a result
    #[error("solver thread exited without a result")]
    WorkerDisconnected,
}

type Coefficients = SmallVec<[f64; 16]>;

/// Solver-ready programme; plain data so it can move to the worker thread.
#[derive(Debug, Clone, PartialEq)]
struct Programme {
    /// Upper bound shared by every variable
    upper: f64,

    /// Objective coefficient per variable
    costs: Coefficients,

    /// One row per wanted food
    rows: Vec<CoverageRow>,

    /// How long the caller waits for a solution
    time_limit: Duration,
}

#[derive(Debug, Clone, PartialEq)]
struct CoverageRow {
    terms: SmallVec<[(usize, f64); 8]>,
    wanted: f64,
}

/// Solver using Integer Linear Programming (ILP)
#[derive(Debug, Clone)]
pub struct ILPSolver<'c> {
    catalog: &'c Catalog,
    fallback: GreedySolver<'c>,
    time_limit: Duration,
}

impl<'c> ILPSolver<'c> {
    /// Create a solver over `catalog` using the configured time limit.
    pub fn new(catalog: &'c Catalog, config: &SolverConfig) -> Self {
        Self {
            catalog,
            fallback: GreedySolver::new(catalog),
            time_limit: config.time_limit(),
        }
    }

    /// Replace the time limit.
    #[must_use]
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    /// How long [`OrderMaker::order`] waits for the solver.
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Solve without falling back to greedy.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the programme cannot be built or solved in time.
    pub fn solve(&self, wanted: &[Item<'c>]) -> Result<Vec<Item<'c>>, SolverError> {
        self.solve_with_observer(wanted, &mut NoopObserver)
    }

    /// Solve with an observer for capturing the ILP formulation.
    ///
    /// The observer sees every variable, objective term and coverage constraint
    /// before the programme is handed to the solver.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the programme cannot be built or solved in time.
    pub fn solve_with_observer(
        &self,
        wanted: &[Item<'c>],
        observer: &mut dyn ILPObserver,
    ) -> Result<Vec<Item<'c>>, SolverError> {
        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        let (items, programme) = self.formulate(wanted, observer)?;

        debug!(
            variables = items.len(),
            constraints = programme.rows.len(),
            "ILP formulated"
        );

        let values = Self::run(programme)?;

        if values.len() != items.len() {
            return Err(SolverError::InvariantViolation {
                message: "solver returned a different number of values than variables",
            });
        }

        let mut order = Vec::new();

        for (item, value) in items.iter().zip(values) {
            let copies = value
                .round()
                .to_usize()
                .ok_or(SolverError::InvariantViolation {
                    message: "solver returned a negative or non-finite item count",
                })?;

            order.extend(iter::repeat_n(*item, copies));
        }

        if !covers(&order, wanted) {
            return Err(SolverError::InvariantViolation {
                message: "solver order does not cover the wanted foods",
            });
        }

        Ok(order)
    }

    /// Build the programme over the items related to `wanted`, in catalog order.
    fn formulate(
        &self,
        wanted: &[Item<'c>],
        observer: &mut dyn ILPObserver,
    ) -> Result<(Vec<Item<'c>>, Programme), SolverError> {
        let foods = expand(wanted);
        let wanted_counts = count(foods.iter().copied());

        let upper = foods
            .len()
            .to_u32()
            .ok_or(SolverError::TooManyFoods(foods.len()))?;

        let items: Vec<Item<'c>> = self
            .catalog
            .items()
            .filter(|item| match *item {
                Item::Food(food) => wanted_counts.contains_key(food),
                Item::Meal(meal) => meal
                    .food()
                    .iter()
                    .any(|food| wanted_counts.contains_key(food)),
            })
            .collect();

        let mut costs = Coefficients::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            let minor_units = item.price().to_minor_units();

            // `good_lp` stores coefficients as `f64`; refuse anything that would not
            // survive the round trip.
            let coeff = i64_to_f64_exact(minor_units)
                .ok_or(SolverError::MinorUnitsNotRepresentable(minor_units))?;

            observer.on_item_variable(index, *item, upper);
            observer.on_objective_term(index, minor_units);

            costs.push(coeff);
        }

        let mut rows = Vec::with_capacity(wanted_counts.len());

        for (food_index, item) in items.iter().enumerate() {
            let Item::Food(food) = *item else {
                continue;
            };

            let Some(&needed) = wanted_counts.get(food) else {
                continue;
            };

            let mut terms: SmallVec<[(usize, u32); 8]> = SmallVec::new();
            terms.push((food_index, 1));

            for (meal_index, candidate) in items.iter().enumerate() {
                let Some(meal) = candidate.as_meal() else {
                    continue;
                };

                let multiplicity = meal.food().iter().filter(|part| *part == food).count();

                if multiplicity > 0 {
                    let multiplicity = multiplicity.to_u32().ok_or(
                        SolverError::InvariantViolation {
                            message: "meal holds more copies of a food than fit in u32",
                        },
                    )?;

                    terms.push((meal_index, multiplicity));
                }
            }

            let needed = needed.to_u32().ok_or(SolverError::TooManyFoods(needed))?;

            observer.on_coverage_constraint(food, &terms, needed);

            rows.push(CoverageRow {
                terms: terms
                    .iter()
                    .map(|&(index, coeff)| (index, f64::from(coeff)))
                    .collect(),
                wanted: f64::from(needed),
            });
        }

        Ok((
            items,
            Programme {
                upper: f64::from(upper),
                costs,
                rows,
                time_limit: self.time_limit,
            },
        ))
    }

    /// Solve `programme` on a worker thread, waiting at most the time limit.
    ///
    /// A worker that overruns is left to finish on its own; its result is dropped.
    /// Under HiGHS it is bounded by the same limit.
    fn run(programme: Programme) -> Result<Coefficients, SolverError> {
        let limit = programme.time_limit;
        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name("combo-ilp".to_string())
            .spawn(move || {
                let result = solve_programme(&programme);

                if tx.send(result).is_err() {
                    debug!("ILP result arrived after the caller stopped waiting");
                }
            })?;

        match rx.recv_timeout(limit) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(SolverError::TimedOut { limit }),
            Err(RecvTimeoutError::Disconnected) => Err(SolverError::WorkerDisconnected),
        }
    }
}

impl<'c> OrderMaker<'c> for ILPSolver<'c> {
    fn name(&self) -> &'static str {
        "ilp"
    }

    fn order(&self, wanted: &[Item<'c>]) -> Vec<Item<'c>> {
        match self.solve(wanted) {
            Ok(order) => {
                info!(
                    items = order.len(),
                    total = %self.catalog.price(&order),
                    "ILP order found"
                );

                order
            }
            Err(SolverError::TimedOut { limit }) => {
                warn!(?limit, "ILP solver timed out, falling back to greedy");

                self.fallback.order(wanted)
            }
            Err(err) => {
                error!(error = %err, "ILP solver failed, falling back to greedy");

                self.fallback.order(wanted)
            }
        }
    }
}

fn solve_programme(programme: &Programme) -> Result<Coefficients, SolverError> {
    let mut pb = ProblemVariables::new();
    let mut cost = Expression::default();
    let mut vars: SmallVec<[Variable; 16]> = SmallVec::with_capacity(programme.costs.len());

    for coeff in &programme.costs {
        let var = pb.add(variable().integer().min(0).max(programme.upper));

        cost += var * *coeff;
        vars.push(var);
    }

    let mut model = pb.minimise(cost).using(default_solver);

    for row in &programme.rows {
        let mut lhs = Expression::default();

        for &(index, coeff) in &row.terms {
            let var = vars
                .get(index)
                .copied()
                .ok_or(SolverError::InvariantViolation {
                    message: "coverage term references a missing variable",
                })?;

            lhs += var * coeff;
        }

        model = model.with(lhs.geq(row.wanted));
    }

    #[cfg(feature = "solver-highs")]
    let model = model.with_time_limit(programme.time_limit.as_secs_f64());

    let solution = model.solve()?;

    Ok(vars.iter().map(|var| solution.value(*var)).collect())
}

/// Convert an `i64` to an `f64` if it can be represented exactly.
fn i64_to_f64_exact(v: i64) -> Option<f64> {
    let f = v.to_f64()?;

    (f.to_i64() == Some(v)).then_some(f)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::HKD;
    use testresult::TestResult;

    use crate::{
        catalog::{CatalogBuilder, CatalogError},
        items::Food,
    };

    use super::*;

    fn test_catalog() -> Result<Catalog, CatalogError> {
        let mut builder = CatalogBuilder::new(HKD);

        builder
            .food("BigBurger", 2000)
            .food("DoubleCheese", 1500)
            .food("Fries(M)", 800)
            .food("Cola(M)", 700)
            .meal("DoubleCheeseMeal", 2500, ["DoubleCheese", "Fries(M)", "Cola(M)"])
            .meal("BigBurgerMeal", 2800, ["BigBurger", "Fries(M)", "Cola(M)"]);

        builder.build()
    }

    fn solver(catalog: &Catalog) -> ILPSolver<'_> {
        ILPSolver::new(catalog, &SolverConfig::default())
    }

    #[derive(Debug, Default)]
    struct RecordingObserver {
        variables: Vec<(usize, String, u32)>,
        objective: Vec<(usize, i64)>,
        constraints: Vec<(String, Vec<(usize, u32)>, u32)>,
    }

    impl ILPObserver for RecordingObserver {
        fn on_item_variable(&mut self, index: usize, item: Item<'_>, upper: u32) {
            self.variables.push((index, item.name().to_string(), upper));
        }

        fn on_objective_term(&mut self, index: usize, minor_units: i64) {
            self.objective.push((index, minor_units));
        }

        fn on_coverage_constraint(&mut self, food: &Food, terms: &[(usize, u32)], wanted: u32) {
            self.constraints
                .push((food.name().to_string(), terms.to_vec(), wanted));
        }
    }

    #[test]
    #[expect(
        clippy::cast_precision_loss,
        reason = "This is a test case for exact conversion"
    )]
    fn i64_to_f64_exact_accepts_exactly_representable_integers() {
        let cases: [i64; 5] = [0, 1, -1, 123, 9_007_199_254_740_992]; // 2^53

        for v in cases {
            assert_eq!(i64_to_f64_exact(v), Some(v as f64));
        }
    }

    #[test]
    fn i64_to_f64_exact_rejects_nonrepresentable_integers() {
        let cases: [i64; 2] = [9_007_199_254_740_993, -9_007_199_254_740_993]; // 2^53 + 1

        for v in cases {
            assert_eq!(i64_to_f64_exact(v), None);
        }
    }

    #[test]
    fn empty_wanted_solves_to_empty_order() -> TestResult {
        let catalog = test_catalog()?;

        assert!(solver(&catalog).solve(&[])?.is_empty());

        Ok(())
    }

    #[test]
    fn single_food_stays_single() -> TestResult {
        let catalog = test_catalog()?;
        let order = solver(&catalog).solve(&catalog.get(&["BigBurger"])?)?;

        assert_eq!(catalog.price(&order).to_minor_units(), 2000);
        assert_eq!(order.len(), 1);

        Ok(())
    }

    #[test]
    fn competing_meals_choose_larger_saving() -> TestResult {
        let catalog = test_catalog()?;
        let wanted = catalog.get(&["DoubleCheese", "BigBurger", "Fries(M)", "Cola(M)"])?;

        let order = solver(&catalog).solve(&wanted)?;
        let names: Vec<&str> = order.iter().map(Item::name).collect();

        assert_eq!(names, ["DoubleCheese", "BigBurgerMeal"]);
        assert_eq!(catalog.price(&order).to_minor_units(), 4300);

        Ok(())
    }

    #[test]
    fn repeated_meal_uses_integer_count() -> TestResult {
        let catalog = test_catalog()?;
        let wanted = catalog.get(&[
            "DoubleCheese",
            "DoubleCheese",
            "Fries(M)",
            "Cola(M)",
            "Fries(M)",
            "Cola(M)",
        ])?;

        let order = solver(&catalog).solve(&wanted)?;
        let names: Vec<&str> = order.iter().map(Item::name).collect();

        assert_eq!(names, ["DoubleCheeseMeal", "DoubleCheeseMeal"]);

        Ok(())
    }

    #[test]
    fn cheaper_superset_is_allowed() -> TestResult {
        let mut builder = CatalogBuilder::new(HKD);
        builder
            .food("Burger", 2000)
            .food("Fries", 800)
            .food("Cola", 700)
            .meal("BurgerMeal", 1900, ["Burger", "Fries", "Cola"]);
        let catalog = builder.build()?;

        let wanted = catalog.get(&["Burger"])?;
        let order = solver(&catalog).solve(&wanted)?;
        let names: Vec<&str> = order.iter().map(Item::name).collect();

        assert_eq!(names, ["BurgerMeal"]);
        assert!(covers(&order, &wanted));

        Ok(())
    }

    #[test]
    fn observer_sees_related_items_only() -> TestResult {
        let catalog = test_catalog()?;
        let mut observer = RecordingObserver::default();

        solver(&catalog).solve_with_observer(&catalog.get(&["BigBurger"])?, &mut observer)?;

        assert_eq!(
            observer.variables,
            [
                (0, "BigBurger".to_string(), 1),
                (1, "BigBurgerMeal".to_string(), 1)
            ]
        );
        assert_eq!(observer.objective, [(0, 2000), (1, 2800)]);
        assert_eq!(
            observer.constraints,
            [("BigBurger".to_string(), vec![(0, 1), (1, 1)], 1)]
        );

        Ok(())
    }

    #[test]
    fn coverage_rows_include_every_meal_holding_the_food() -> TestResult {
        let catalog = test_catalog()?;
        let mut observer = RecordingObserver::default();
        let wanted = catalog.get(&["DoubleCheese", "BigBurger", "Fries(M)", "Cola(M)"])?;

        solver(&catalog).solve_with_observer(&wanted, &mut observer)?;

        assert_eq!(observer.variables.len(), 6);
        assert!(observer.variables.iter().all(|(_, _, upper)| *upper == 4));
        assert_eq!(observer.constraints.len(), 4);
        assert!(
            observer
                .constraints
                .contains(&("Fries(M)".to_string(), vec![(2, 1), (4, 1), (5, 1)], 1))
        );

        Ok(())
    }

    #[test]
    fn meal_multiplicity_becomes_coefficient() -> TestResult {
        let mut builder = CatalogBuilder::new(HKD);
        builder
            .food("Cola", 700)
            .meal("TwoColas", 1200, ["Cola", "Cola"]);
        let catalog = builder.build()?;

        let mut observer = RecordingObserver::default();
        let wanted = catalog.get(&["Cola", "Cola", "Cola"])?;

        let order = solver(&catalog).solve_with_observer(&wanted, &mut observer)?;

        assert_eq!(
            observer.constraints,
            [("Cola".to_string(), vec![(0, 1), (1, 2)], 3)]
        );
        assert_eq!(catalog.price(&order).to_minor_units(), 1900);

        Ok(())
    }

    #[test]
    fn order_falls_back_to_a_covering_order_under_a_tiny_limit() -> TestResult {
        let catalog = test_catalog()?;
        let wanted = catalog.get(&["DoubleCheese", "BigBurger", "Fries(M)", "Cola(M)"])?;

        let ilp = solver(&catalog).with_time_limit(Duration::from_nanos(1));
        let order = ilp.order(&wanted);

        assert!(covers(&order, &wanted));
        assert_eq!(catalog.price(&order).to_minor_units(), 4300);

        Ok(())
    }

    #[test]
    fn unrepresentable_price_falls_back_to_greedy() -> TestResult {
        let mut builder = CatalogBuilder::new(HKD);
        builder
            .food("Gold", 9_007_199_254_740_993) // 2^53 + 1
            .food("Cola", 700)
            .food("Fries", 800)
            .meal("Combo", 1200, ["Cola", "Fries"]);
        let catalog = builder.build()?;

        let wanted = catalog.get(&["Gold", "Cola", "Fries"])?;
        let ilp = solver(&catalog);

        assert!(matches!(
            ilp.solve(&wanted),
            Err(SolverError::MinorUnitsNotRepresentable(9_007_199_254_740_993))
        ));

        let order = ilp.order(&wanted);
        let names: Vec<&str> = order.iter().map(Item::name).collect();

        assert_eq!(order, GreedySolver::new(&catalog).order(&wanted));
        assert_eq!(names, ["Combo", "Gold"]);

        Ok(())
    }

    #[test]
    fn programme_carries_the_time_limit() -> TestResult {
        let catalog = test_catalog()?;
        let ilp = solver(&catalog).with_time_limit(Duration::from_millis(250));

        let (_, programme) = ilp.formulate(&catalog.get(&["BigBurger"])?, &mut NoopObserver)?;

        assert_eq!(programme.time_limit, Duration::from_millis(250));

        Ok(())
    }

    #[test]
    fn config_time_limit_is_applied() -> TestResult {
        let catalog = test_catalog()?;
        let config = SolverConfig { time_limit_ms: 250 };

        assert_eq!(
            ILPSolver::new(&catalog, &config).time_limit(),
            Duration::from_millis(250)
        );

        Ok(())
    }
}
