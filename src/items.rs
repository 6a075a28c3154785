//! Items
//!
//! A catalog entry is either a [`Food`] (a leaf) or a [`Meal`] (a discounted bundle
//! of foods). [`Item`] is the borrowed, copyable view over either variant that the
//! optimisers pass around.
//!
//! Equality and hashing are by name only: the copy of a food held inside a meal is
//! equal to the catalog's own entry of the same name.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;
use smallvec::SmallVec;

new_key_type! {
    /// Catalog Item Key
    pub struct ItemKey;
}

/// A leaf catalog item.
#[derive(Debug, Clone)]
pub struct Food {
    key: ItemKey,
    name: String,
    price: Money<'static, Currency>,
}

impl Food {
    pub(crate) fn new(key: ItemKey, name: String, price: Money<'static, Currency>) -> Self {
        Self { key, name, price }
    }

    /// Catalog key of this food
    pub fn key(&self) -> ItemKey {
        self.key
    }

    /// Food name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Food price
    pub fn price(&self) -> Money<'static, Currency> {
        self.price
    }
}

impl PartialEq for Food {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Food {}

impl Hash for Food {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// A bundle of foods sold together at a discount.
#[derive(Debug, Clone)]
pub struct Meal {
    key: ItemKey,
    name: String,
    price: Money<'static, Currency>,
    food: SmallVec<[Food; 4]>,
}

impl Meal {
    pub(crate) fn new(
        key: ItemKey,
        name: String,
        price: Money<'static, Currency>,
        food: SmallVec<[Food; 4]>,
    ) -> Self {
        Self {
            key,
            name,
            price,
            food,
        }
    }

    /// Catalog key of this meal
    pub fn key(&self) -> ItemKey {
        self.key
    }

    /// Meal name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Meal price
    pub fn price(&self) -> Money<'static, Currency> {
        self.price
    }

    /// Foods bundled by this meal, in declaration order (duplicates allowed).
    pub fn food(&self) -> &[Food] {
        &self.food
    }

    /// Sum of the bundled foods' individual prices, in minor units.
    pub fn parts_minor_units(&self) -> i64 {
        self.food
            .iter()
            .map(|food| food.price.to_minor_units())
            .sum()
    }

    /// Money saved by buying the meal instead of its foods, in minor units.
    pub fn savings_minor_units(&self) -> i64 {
        self.parts_minor_units() - self.price.to_minor_units()
    }
}

impl PartialEq for Meal {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Meal {}

impl Hash for Meal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Borrowed view over a catalog entry.
#[derive(Debug, Clone, Copy)]
pub enum Item<'c> {
    /// A single food
    Food(&'c Food),

    /// A bundle of foods
    Meal(&'c Meal),
}

impl<'c> Item<'c> {
    /// Catalog key of the item
    pub fn key(&self) -> ItemKey {
        match *self {
            Item::Food(food) => food.key,
            Item::Meal(meal) => meal.key,
        }
    }

    /// Item name
    pub fn name(&self) -> &'c str {
        match *self {
            Item::Food(food) => &food.name,
            Item::Meal(meal) => &meal.name,
        }
    }

    /// Item price
    pub fn price(&self) -> Money<'static, Currency> {
        match *self {
            Item::Food(food) => food.price,
            Item::Meal(meal) => meal.price,
        }
    }

    /// Meal composition; empty for a food.
    pub fn food(&self) -> &'c [Food] {
        match *self {
            Item::Food(_) => &[],
            Item::Meal(meal) => meal.food(),
        }
    }

    /// The foods this item contributes to an order: itself for a food, its
    /// composition for a meal.
    pub fn expand(&self) -> SmallVec<[&'c Food; 4]> {
        match *self {
            Item::Food(food) => SmallVec::from_elem(food, 1),
            Item::Meal(meal) => meal.food.iter().collect(),
        }
    }

    /// Returns the meal if this item is one.
    pub fn as_meal(&self) -> Option<&'c Meal> {
        match *self {
            Item::Food(_) => None,
            Item::Meal(meal) => Some(meal),
        }
    }

    /// Whether this item is a meal
    pub fn is_meal(&self) -> bool {
        matches!(self, Item::Meal(_))
    }
}

impl<'c> From<&'c Food> for Item<'c> {
    fn from(food: &'c Food) -> Self {
        Item::Food(food)
    }
}

impl<'c> From<&'c Meal> for Item<'c> {
    fn from(meal: &'c Meal) -> Self {
        Item::Meal(meal)
    }
}

impl PartialEq for Item<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for Item<'_> {}

impl Hash for Item<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl fmt::Display for Item<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Food(food) => write!(f, "Food({}, {})", food.name, food.price),
            Item::Meal(meal) => write!(f, "Meal({}, {})", meal.name, meal.price),
        }
    }
}
