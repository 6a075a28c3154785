//! Order utilities
//!
//! Multiset helpers shared by every strategy. An order "covers" a wanted list when
//! its food expansion contains at least as many of every food as the wanted list's
//! expansion does.

use std::hash::Hash;

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};

use crate::items::{Food, Item, Meal};

/// Replace each meal with its foods (in order); foods are kept as-is.
pub fn expand<'c>(items: &[Item<'c>]) -> Vec<&'c Food> {
    items.iter().flat_map(Item::expand).collect()
}

/// Count occurrences of each element.
pub fn count<T: Hash + Eq>(items: impl IntoIterator<Item = T>) -> FxHashMap<T, usize> {
    let mut counts = FxHashMap::default();

    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }

    counts
}

/// Whether `needle` is a sub-multiset of `haystack`.
pub fn contains<T: Hash + Eq>(
    haystack: &FxHashMap<T, usize>,
    needle: &FxHashMap<T, usize>,
) -> bool {
    needle
        .iter()
        .all(|(item, n)| haystack.get(item).is_some_and(|have| have >= n))
}

/// Whether the foods of `order` cover the foods of `wanted`.
pub fn covers(order: &[Item<'_>], wanted: &[Item<'_>]) -> bool {
    contains(&count(expand(order)), &count(expand(wanted)))
}

/// Remove one occurrence of each of `foods` from `remaining`.
///
/// Returns `false` and leaves `remaining` untouched if it does not contain them all.
pub fn remove_all(remaining: &mut Vec<&Food>, foods: &[Food]) -> bool {
    if !contains(&count(remaining.iter().copied()), &count(foods)) {
        return false;
    }

    for food in foods {
        if let Some(pos) = remaining.iter().position(|candidate| *candidate == food) {
            remaining.remove(pos);
        }
    }

    true
}

/// Total price of `items` as given (meals are not expanded).
pub fn total_price(items: &[Item<'_>], currency: &'static Currency) -> Money<'static, Currency> {
    Money::from_minor(
        items.iter().map(|item| item.price().to_minor_units()).sum(),
        currency,
    )
}

/// Money saved by buying `meal` rather than its foods individually.
pub fn savings(meal: &Meal, currency: &'static Currency) -> Money<'static, Currency> {
    Money::from_minor(meal.savings_minor_units(), currency)
}
