//! Receipt

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    catalog::Catalog,
    items::{Food, Item, Meal},
    order::expand,
};

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Priced summary of an order against the foods that were wanted.
#[derive(Debug, Clone)]
pub struct Receipt<'c> {
    /// Ordered items, in order
    items: SmallVec<[Item<'c>; 10]>,

    /// Price of every wanted food bought individually
    subtotal: Money<'static, Currency>,

    /// Price of the order
    total: Money<'static, Currency>,

    /// Currency used for all monetary values
    currency: &'static Currency,
}

impl<'c> Receipt<'c> {
    /// Price `order` against the wanted items it was made for.
    pub fn new(catalog: &Catalog, wanted: &[Item<'c>], order: &[Item<'c>]) -> Self {
        let currency = catalog.currency();
        let subtotal = expand(wanted)
            .iter()
            .map(|food| food.price().to_minor_units())
            .sum();

        Self {
            items: order.iter().copied().collect(),
            subtotal: Money::from_minor(subtotal, currency),
            total: catalog.price(order),
            currency,
        }
    }

    /// Ordered items
    pub fn items(&self) -> &[Item<'c>] {
        &self.items
    }

    /// Price of the wanted foods bought individually
    pub fn subtotal(&self) -> Money<'static, Currency> {
        self.subtotal
    }

    /// Price of the order
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }

    /// Currency used for all monetary values
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Money saved compared to buying every wanted food individually.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'static, Currency>, MoneyError> {
        self.subtotal.sub(self.total)
    }

    /// Savings as a fraction of the subtotal
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        let savings_minor = self.savings()?.to_minor_units();
        let subtotal_minor = self.subtotal.to_minor_units();

        if subtotal_minor == 0 {
            return Ok(Percentage::from(0.0));
        }

        Ok(Percentage::from(
            Decimal::from(savings_minor) / Decimal::from(subtotal_minor),
        ))
    }

    /// Savings in percent points, rounded to two decimal places.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings_percent_points(&self) -> Result<Decimal, MoneyError> {
        Ok((self.savings_percent()? * Decimal::ONE_HUNDRED).round_dp(2))
    }

    /// Savings of each distinct meal in the order, in order of first appearance.
    ///
    /// Each entry holds the meal, how many were ordered and what they saved in total
    /// against their foods' individual prices.
    pub fn meal_savings(&self) -> Vec<(&'c Meal, i64, Money<'static, Currency>)> {
        let mut tally: SmallVec<[(&'c Meal, i64); 4]> = SmallVec::new();

        for meal in self.items.iter().filter_map(Item::as_meal) {
            match tally.iter_mut().find(|(seen, _)| *seen == meal) {
                Some((_, copies)) => *copies += 1,
                None => tally.push((meal, 1)),
            }
        }

        tally
            .into_iter()
            .map(|(meal, copies)| {
                let saved = Money::from_minor(meal.savings_minor_units() * copies, self.currency);

                (meal, copies, saved)
            })
            .collect()
    }

    /// Renders the receipt as a table followed by a summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Contents", "Price", "Parts", "Savings"]);

        for (idx, item) in self.items.iter().enumerate() {
            builder.push_record(self.item_row(idx, *item));
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());

        theme.remove_horizontal_lines();

        table.with(theme);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(3..6), Alignment::right());
        table.modify(Columns::new(5..6), Color::FG_GREEN);

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        self.write_summary(&mut out)
    }

    /// Subtotal, one line per meal saving, overall savings and the total.
    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["Subtotal".to_string(), self.subtotal.to_string()]);

        for (meal, copies, saved) in self.meal_savings() {
            builder.push_record([format!("{} x{copies}", meal.name()), format!("-{saved}")]);
        }

        builder.push_record([
            format!("Savings ({:.2}%)", self.savings_percent_points()?),
            format!("-{}", self.savings()?),
        ]);
        builder.push_record(["Total".to_string(), self.total.to_string()]);

        let mut table = builder.build();

        table.with(Style::blank());
        table.modify(Columns::last(), Alignment::right());
        table.modify(Rows::last(), Color::BOLD);

        writeln!(out, "{table}\n").map_err(|_err| ReceiptError::IO)
    }

    fn item_row(&self, idx: usize, item: Item<'_>) -> [String; 6] {
        let position = format!("#{:<3}", idx + 1);

        match item.as_meal() {
            Some(meal) => {
                let contents: Vec<&str> = meal.food().iter().map(Food::name).collect();

                [
                    position,
                    meal.name().to_string(),
                    contents.join("\n"),
                    meal.price().to_string(),
                    Money::from_minor(meal.parts_minor_units(), self.currency).to_string(),
                    format!(
                        "-{}",
                        Money::from_minor(meal.savings_minor_units(), self.currency)
                    ),
                ]
            }
            None => [
                position,
                item.name().to_string(),
                String::new(),
                item.price().to_string(),
                String::new(),
                String::new(),
            ],
        }
    }
}
