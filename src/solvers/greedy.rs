//! Greedy Solver
//!
//! Repeatedly bundles the remaining foods into the meal with the largest savings.
//! Always valid and never dearer than ordering each food separately, but not
//! optimal when a smaller saving would unlock a larger one.

use smallvec::SmallVec;
use tracing::{debug, error};

use crate::{
    catalog::Catalog,
    items::{Food, Item, Meal},
    order::{contains, count, expand, remove_all},
    solvers::OrderMaker,
};

/// Solver that picks the worthiest meal until none fits
#[derive(Debug, Clone)]
pub struct GreedySolver<'c> {
    /// Meals sorted by savings, largest first; ties keep catalog order.
    meals: SmallVec<[&'c Meal; 16]>,
}

impl<'c> GreedySolver<'c> {
    /// Precompute the savings-sorted meal list for `catalog`.
    pub fn new(catalog: &'c Catalog) -> Self {
        let mut meals: SmallVec<[&'c Meal; 16]> = catalog.meals().collect();

        // Stable sort keeps catalog order between equal savings.
        meals.sort_by_key(|meal| std::cmp::Reverse(meal.savings_minor_units()));

        Self { meals }
    }

    /// Meals in the order they are tried.
    pub fn meals(&self) -> &[&'c Meal] {
        &self.meals
    }

    /// The first meal, by savings, whose foods are all in `remaining`.
    pub fn worthiest_meal(&self, remaining: &[&'c Food]) -> Option<&'c Meal> {
        let available = count(remaining.iter().copied());

        self.meals
            .iter()
            .copied()
            .find(|meal| contains(&available, &count(meal.food())))
    }
}

impl<'c> OrderMaker<'c> for GreedySolver<'c> {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn order(&self, wanted: &[Item<'c>]) -> Vec<Item<'c>> {
        let mut remaining = expand(wanted);
        let mut result = Vec::with_capacity(remaining.len());

        while let Some(meal) = self.worthiest_meal(&remaining) {
            if !remove_all(&mut remaining, meal.food()) {
                error!(meal = meal.name(), "meal matched but its food could not be removed");
                break;
            }

            result.push(Item::Meal(meal));
        }

        debug!(
            meals = result.len(),
            leftovers = remaining.len(),
            "greedy order built"
        );

        result.extend(remaining.into_iter().map(Item::Food));

        result
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::HKD;
    use testresult::TestResult;

    use crate::catalog::{CatalogBuilder, CatalogError};

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

    fn names<'c>(items: &[Item<'c>]) -> Vec<&'c str> {
        items.iter().map(Item::name).collect()
    }

    #[test]
    fn meals_are_sorted_by_savings() -> TestResult {
        let catalog = test_catalog()?;
        let solver = GreedySolver::new(&catalog);
        let meals: Vec<&str> = solver.meals().iter().map(|meal| meal.name()).collect();

        assert_eq!(meals, ["BigBurgerMeal", "DoubleCheeseMeal"]);

        Ok(())
    }

    #[test]
    fn ties_keep_catalog_order() -> TestResult {
        let mut builder = CatalogBuilder::new(HKD);
        builder
            .food("Fries", 800)
            .food("Cola", 700)
            .food("Tea", 700)
            .meal("FriesCola", 1300, ["Fries", "Cola"])
            .meal("FriesTea", 1300, ["Fries", "Tea"]);
        let catalog = builder.build()?;

        let solver = GreedySolver::new(&catalog);
        let wanted = catalog.get(&["Tea", "Cola", "Fries"])?;

        assert_eq!(names(&solver.order(&wanted)), ["FriesCola", "Tea"]);

        Ok(())
    }

    #[test]
    fn worthiest_meal_requires_every_food() -> TestResult {
        let catalog = test_catalog()?;
        let solver = GreedySolver::new(&catalog);

        let wanted = catalog.get(&["DoubleCheese", "Fries(M)", "Cola(M)", "BigBurger"])?;
        let worthiest = solver.worthiest_meal(&expand(&wanted));
        assert_eq!(worthiest.map(Meal::name), Some("BigBurgerMeal"));

        let wanted = catalog.get(&["BigBurger", "Fries(M)"])?;
        assert!(solver.worthiest_meal(&expand(&wanted)).is_none());

        Ok(())
    }

    #[test]
    fn prefers_the_meal_with_larger_savings() -> TestResult {
        let catalog = test_catalog()?;
        let solver = GreedySolver::new(&catalog);

        let wanted = catalog.get(&["DoubleCheese", "BigBurger", "Fries(M)", "Cola(M)"])?;
        let order = solver.order(&wanted);

        assert_eq!(names(&order), ["BigBurgerMeal", "DoubleCheese"]);
        assert_eq!(catalog.price(&order).to_minor_units(), 4300);

        Ok(())
    }

    #[test]
    fn reuses_a_meal_while_it_fits() -> TestResult {
        let catalog = test_catalog()?;
        let solver = GreedySolver::new(&catalog);

        let wanted = catalog.get(&[
            "DoubleCheese",
            "DoubleCheese",
            "Fries(M)",
            "Cola(M)",
            "Fries(M)",
            "Cola(M)",
        ])?;

        assert_eq!(
            names(&solver.order(&wanted)),
            ["DoubleCheeseMeal", "DoubleCheeseMeal"]
        );

        Ok(())
    }

    #[test]
    fn wanted_meals_are_expanded_first() -> TestResult {
        let catalog = test_catalog()?;
        let solver = GreedySolver::new(&catalog);

        let wanted = catalog.get(&["DoubleCheeseMeal", "BigBurger"])?;

        assert_eq!(
            names(&solver.order(&wanted)),
            ["BigBurgerMeal", "DoubleCheese"]
        );

        Ok(())
    }

    #[test]
    fn empty_wanted_gives_empty_order() -> TestResult {
        let catalog = test_catalog()?;

        assert!(GreedySolver::new(&catalog).order(&[]).is_empty());

        Ok(())
    }
}
