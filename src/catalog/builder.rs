//! Builder for constructing validated catalogs.

use rustc_hash::{FxHashMap, FxHashSet};
use rusty_money::{Money, iso::Currency};
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::{
    catalog::{
        Catalog, Entry,
        error::{CatalogError, MalformedCatalog},
    },
    items::{Food, ItemKey, Meal},
};

#[derive(Debug)]
enum Draft {
    Food {
        name: String,
        price: i64,
    },
    Meal {
        name: String,
        price: i64,
        food: SmallVec<[String; 4]>,
    },
}

impl Draft {
    fn name(&self) -> &str {
        match self {
            Draft::Food { name, .. } | Draft::Meal { name, .. } => name,
        }
    }

    fn price(&self) -> i64 {
        match self {
            Draft::Food { price, .. } | Draft::Meal { price, .. } => *price,
        }
    }
}

/// Builder for constructing a validated [`Catalog`].
///
/// Entries may be declared in any order (a meal may precede the foods it bundles);
/// declaration order becomes the catalog order used for tie-breaking.
#[derive(Debug)]
pub struct CatalogBuilder {
    currency: &'static Currency,
    drafts: Vec<Draft>,
}

impl CatalogBuilder {
    /// Create a new empty builder for a single-currency catalog.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            currency,
            drafts: Vec::new(),
        }
    }

    /// Declare a food priced in minor units.
    pub fn food(&mut self, name: impl Into<String>, price: i64) -> &mut Self {
        self.drafts.push(Draft::Food {
            name: name.into(),
            price,
        });

        self
    }

    /// Declare a meal priced in minor units, bundling the named foods.
    pub fn meal<S: Into<String>>(
        &mut self,
        name: impl Into<String>,
        price: i64,
        food: impl IntoIterator<Item = S>,
    ) -> &mut Self {
        self.drafts.push(Draft::Meal {
            name: name.into(),
            price,
            food: food.into_iter().map(Into::into).collect(),
        });

        self
    }

    /// Validate the declared entries and freeze them into a [`Catalog`].
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Malformed`] on duplicate names, negative prices, empty
    /// meals, meals referencing unknown or non-food entries, or meals priced above
    /// the sum of their foods.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        let Self { currency, drafts } = self;

        validate_names_and_prices(&drafts)?;

        let mut entries: SlotMap<ItemKey, Entry> = SlotMap::with_key();
        let mut keys: FxHashMap<String, ItemKey> = FxHashMap::default();
        let mut foods: FxHashMap<&str, Food> = FxHashMap::default();

        // Foods first, so meals can copy them regardless of declaration order.
        for draft in &drafts {
            if let Draft::Food { name, price } = draft {
                let key = entries.insert_with_key(|key| {
                    Entry::Food(Food::new(
                        key,
                        name.clone(),
                        Money::from_minor(*price, currency),
                    ))
                });

                if let Some(Entry::Food(food)) = entries.get(key) {
                    foods.insert(name.as_str(), food.clone());
                }

                keys.insert(name.clone(), key);
            }
        }

        let meal_names: FxHashSet<&str> = drafts
            .iter()
            .filter(|draft| matches!(draft, Draft::Meal { .. }))
            .map(Draft::name)
            .collect();

        for draft in &drafts {
            if let Draft::Meal { name, price, food } = draft {
                let bundled = resolve_meal_food(name, *price, food, &foods, &meal_names)?;

                let key = entries.insert_with_key(|key| {
                    Entry::Meal(Meal::new(
                        key,
                        name.clone(),
                        Money::from_minor(*price, currency),
                        bundled,
                    ))
                });

                keys.insert(name.clone(), key);
            }
        }

        let order = drafts
            .iter()
            .filter_map(|draft| keys.get(draft.name()).copied())
            .collect();

        Ok(Catalog {
            currency,
            entries,
            keys,
            order,
        })
    }
}

fn validate_names_and_prices(drafts: &[Draft]) -> Result<(), MalformedCatalog> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();

    for draft in drafts {
        if !seen.insert(draft.name()) {
            return Err(MalformedCatalog::DuplicateName(draft.name().to_string()));
        }

        if draft.price() < 0 {
            return Err(MalformedCatalog::NegativePrice {
                name: draft.name().to_string(),
                price: draft.price(),
            });
        }
    }

    Ok(())
}

fn resolve_meal_food(
    meal: &str,
    price: i64,
    names: &[String],
    foods: &FxHashMap<&str, Food>,
    meal_names: &FxHashSet<&str>,
) -> Result<SmallVec<[Food; 4]>, MalformedCatalog> {
    if names.is_empty() {
        return Err(MalformedCatalog::EmptyMeal(meal.to_string()));
    }

    let bundled = names
        .iter()
        .map(|name| {
            foods.get(name.as_str()).cloned().ok_or_else(|| {
                if meal_names.contains(name.as_str()) {
                    MalformedCatalog::NestedMeal {
                        meal: meal.to_string(),
                        food: name.clone(),
                    }
                } else {
                    MalformedCatalog::UnknownFood {
                        meal: meal.to_string(),
                        food: name.clone(),
                    }
                }
            })
        })
        .collect::<Result<SmallVec<[Food; 4]>, _>>()?;

    let parts: i64 = bundled.iter().map(|food| food.price().to_minor_units()).sum();

    if price > parts {
        return Err(MalformedCatalog::MealPriceExceedsParts {
            meal: meal.to_string(),
            price,
            parts,
        });
    }

    Ok(bundled)
}
