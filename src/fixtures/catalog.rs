//! Catalog Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::iso::{self, Currency};
use serde::Deserialize;

use crate::{
    catalog::{Catalog, CatalogBuilder},
    fixtures::FixtureError,
};

/// Wrapper for catalog items in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Items in catalog order
    pub items: Vec<ItemFixture>,
}

/// Item Fixture
#[derive(Debug, Deserialize)]
pub struct ItemFixture {
    /// Item name
    pub name: String,

    /// Item price (e.g., "20.00 HKD")
    pub price: String,

    /// Bundled food names; present only for meals
    #[serde(default)]
    pub food: Option<Vec<String>>,
}

impl CatalogFixture {
    /// Validate prices and currencies, then build the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error on unparseable prices, mixed currencies, an empty item list,
    /// or a catalog that fails validation.
    pub fn into_catalog(self) -> Result<Catalog, FixtureError> {
        let mut currency: Option<&'static Currency> = None;
        let mut priced = Vec::with_capacity(self.items.len());

        for item in self.items {
            let (minor_units, item_currency) = parse_price(&item.price)?;

            match currency {
                Some(existing) if existing != item_currency => {
                    return Err(FixtureError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        item_currency.iso_alpha_code.to_string(),
                    ));
                }
                Some(_) => {}
                None => currency = Some(item_currency),
            }

            priced.push((item, minor_units));
        }

        let mut builder = CatalogBuilder::new(currency.ok_or(FixtureError::NoItems)?);

        for (item, minor_units) in priced {
            match item.food {
                Some(food) => builder.meal(item.name, minor_units, food),
                None => builder.food(item.name, minor_units),
            };
        }

        Ok(builder.build()?)
    }
}

/// Parse a price such as `"20.00 HKD"` into minor units and its ISO currency.
///
/// The amount is scaled by the currency's minor-unit exponent and rounded, not
/// truncated, so `"500 JPY"` is 500 and `"8.999 HKD"` is 900.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPrice`] if the string is not `AMOUNT CODE` or the
/// amount does not fit in minor units, and [`FixtureError::UnknownCurrency`] if the
/// code is not an ISO 4217 currency.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let invalid = || FixtureError::InvalidPrice(format!("expected 'AMOUNT CURRENCY', got: {s}"));

    let (amount, code) = s
        .trim()
        .split_once(char::is_whitespace)
        .ok_or_else(invalid)?;
    let code = code.trim();

    let currency =
        iso::find(code).ok_or_else(|| FixtureError::UnknownCurrency(code.to_string()))?;

    let amount: Decimal = amount.parse().map_err(|_err| invalid())?;

    let minor_units = 10_i64
        .checked_pow(currency.exponent)
        .and_then(|scale| amount.checked_mul(Decimal::from(scale)))
        .and_then(|scaled| scaled.round_dp(0).to_i64())
        .ok_or_else(invalid)?;

    Ok((minor_units, currency))
}
