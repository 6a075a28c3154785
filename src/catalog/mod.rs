//! Catalog
//!
//! The menu: an immutable, single-currency lookup of foods and meals by name.
//! Build one with [`CatalogBuilder`] or load one with [`crate::fixtures`].

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use slotmap::SlotMap;

use crate::items::{Food, Item, ItemKey, Meal};

pub mod builder;
pub mod error;

pub use builder::CatalogBuilder;
pub use error::{CatalogError, MalformedCatalog};

#[derive(Debug)]
enum Entry {
    Food(Food),
    Meal(Meal),
}

impl Entry {
    fn as_item(&self) -> Item<'_> {
        match self {
            Entry::Food(food) => Item::Food(food),
            Entry::Meal(meal) => Item::Meal(meal),
        }
    }
}

/// Catalog of foods and meals
#[derive(Debug)]
pub struct Catalog {
    currency: &'static Currency,

    /// Owned entries, addressed by key
    entries: SlotMap<ItemKey, Entry>,

    /// Name -> key lookup
    keys: FxHashMap<String, ItemKey>,

    /// Declaration order
    order: Vec<ItemKey>,
}

impl Catalog {
    /// Currency all prices are expressed in
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Number of entries (foods and meals)
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All entries keyed by name.
    pub fn all(&self) -> FxHashMap<&str, Item<'_>> {
        self.items().map(|item| (item.name(), item)).collect()
    }

    /// All entries in catalog order.
    pub fn items(&self) -> impl Iterator<Item = Item<'_>> {
        self.order
            .iter()
            .filter_map(|key| self.entries.get(*key).map(Entry::as_item))
    }

    /// All meals in catalog order.
    pub fn meals(&self) -> impl Iterator<Item = &Meal> {
        self.order
            .iter()
            .filter_map(|key| match self.entries.get(*key) {
                Some(Entry::Meal(meal)) => Some(meal),
                _ => None,
            })
    }

    /// Look up an entry by key.
    pub fn by_key(&self, key: ItemKey) -> Option<Item<'_>> {
        self.entries.get(key).map(Entry::as_item)
    }

    /// Look up a single entry by name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownItem`] if the name is not on the menu.
    pub fn item(&self, name: &str) -> Result<Item<'_>, CatalogError> {
        self.keys
            .get(name)
            .and_then(|key| self.by_key(*key))
            .ok_or_else(|| CatalogError::UnknownItem(name.to_string()))
    }

    /// Look up each name in order, preserving duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownItem`] for the first name not on the menu.
    pub fn get<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Item<'_>>, CatalogError> {
        names.iter().map(|name| self.item(name.as_ref())).collect()
    }

    /// Sum of the prices of `items` as given (meals are not expanded).
    pub fn price(&self, items: &[Item<'_>]) -> Money<'static, Currency> {
        Money::from_minor(
            items.iter().map(|item| item.price().to_minor_units()).sum(),
            self.currency,
        )
    }
}
