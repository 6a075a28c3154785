//! Catalog errors

use thiserror::Error;

/// Errors raised by catalog lookups and construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A requested name is not on the menu.
    #[error("no such item on the menu: {0}")]
    UnknownItem(String),

    /// The catalog violates one of its construction invariants.
    #[error("malformed catalog: {0}")]
    Malformed(#[from] MalformedCatalog),
}

/// Catalog invariant violations detected while building a catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedCatalog {
    /// Two entries share a name.
    #[error("duplicate item name: {0}")]
    DuplicateName(String),

    /// An entry has a price below zero.
    #[error("item {name} has a negative price ({price} minor units)")]
    NegativePrice {
        /// Item name
        name: String,

        /// Offending price in minor units
        price: i64,
    },

    /// A meal bundles no foods.
    #[error("meal {0} contains no food")]
    EmptyMeal(String),

    /// A meal lists a name that is not in the catalog.
    #[error("meal {meal} references unknown food {food}")]
    UnknownFood {
        /// Meal name
        meal: String,

        /// Missing food name
        food: String,
    },

    /// A meal lists another meal; meals only bundle foods.
    #[error("meal {meal} references meal {food}; meals may only contain food")]
    NestedMeal {
        /// Meal name
        meal: String,

        /// Name of the nested meal
        food: String,
    },

    /// A meal costs more than buying its foods separately.
    #[error("meal {meal} costs {price} but its foods cost {parts} (minor units)")]
    MealPriceExceedsParts {
        /// Meal name
        meal: String,

        /// Meal price in minor units
        price: i64,

        /// Sum of the bundled food prices in minor units
        parts: i64,
    },
}
