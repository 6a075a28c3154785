//! Tree Search Solver
//!
//! Exhaustive depth-first search over meal combinations. Meals are tried in catalog
//! order and a branch only revisits meals at or after its own index, so each
//! combination is explored once. A meal may be taken repeatedly.

use smallvec::SmallVec;
use tracing::debug;

use crate::{
    catalog::Catalog,
    items::{Food, Item, Meal},
    order::{count, expand, remove_all},
    solvers::OrderMaker,
};

/// Solver that finds the combination of meals with the largest total savings
#[derive(Debug, Clone)]
pub struct TreeSearchSolver<'c> {
    /// Meals in catalog order
    meals: SmallVec<[&'c Meal; 16]>,
}

impl<'c> TreeSearchSolver<'c> {
    /// Fix the meal ordering for `catalog`.
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            meals: catalog.meals().collect(),
        }
    }

    /// Meals in the order they are explored.
    pub fn meals(&self) -> &[&'c Meal] {
        &self.meals
    }
}

impl<'c> OrderMaker<'c> for TreeSearchSolver<'c> {
    fn name(&self) -> &'static str {
        "search"
    }

    fn order(&self, wanted: &[Item<'c>]) -> Vec<Item<'c>> {
        let foods = expand(wanted);
        let available = count(foods.iter().copied());

        // Meals needing a food that was never wanted can't be combined anywhere.
        let candidates: SmallVec<[&'c Meal; 16]> = self
            .meals
            .iter()
            .copied()
            .filter(|meal| meal.food().iter().all(|food| available.contains_key(food)))
            .collect();

        let mut search = Search::new(&candidates);
        search.try_all(0, &foods, 0);

        debug!(
            candidates = candidates.len(),
            visited = search.visited,
            saved = search.best_saved,
            "tree search finished"
        );

        match search.best {
            Some((meals, leftovers)) => meals
                .into_iter()
                .map(Item::Meal)
                .chain(leftovers.into_iter().map(Item::Food))
                .collect(),
            None => wanted.to_vec(),
        }
    }
}

type Combination<'c> = (Vec<&'c Meal>, Vec<&'c Food>);

/// Per-call search state
struct Search<'s, 'c> {
    meals: &'s [&'c Meal],
    stack: Vec<&'c Meal>,
    best_saved: i64,
    best: Option<Combination<'c>>,
    visited: usize,
}

impl<'s, 'c> Search<'s, 'c> {
    fn new(meals: &'s [&'c Meal]) -> Self {
        Self {
            meals,
            stack: Vec::new(),
            best_saved: 0,
            best: None,
            visited: 0,
        }
    }

    /// Try every meal from `from` onwards; true if any of them fit.
    fn try_all(&mut self, from: usize, remaining: &[&'c Food], saved: i64) -> bool {
        let meals = self.meals;
        let mut combined = false;

        for (index, meal) in meals.iter().copied().enumerate().skip(from) {
            combined |= self.try_combine(index, meal, remaining, saved);
        }

        combined
    }

    fn try_combine(
        &mut self,
        index: usize,
        meal: &'c Meal,
        remaining: &[&'c Food],
        saved: i64,
    ) -> bool {
        let mut rest = remaining.to_vec();
        if !remove_all(&mut rest, meal.food()) {
            return false;
        }

        self.visited += 1;

        let saved = saved + meal.savings_minor_units();
        self.stack.push(meal);

        // Keep the index so the same meal can be taken again.
        let extended = self.try_all(index, &rest, saved);

        if !extended && saved > self.best_saved {
            self.best_saved = saved;
            self.best = Some((self.stack.clone(), rest));
        }

        self.stack.pop();

        true
    }
}
