//! Fixtures
//!
//! YAML loaders for catalogs and order test cases. A fixture directory looks like:
//!
//! ```text
//! fixtures/
//!   catalogs/<name>.yml
//!   cases/<name>.yml
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::catalog::{Catalog, CatalogError};

pub mod cases;
pub mod catalog;

pub use cases::OrderCase;
pub use catalog::{CatalogFixture, ItemFixture, parse_price};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between items
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Catalog has no items, so its currency is unknown
    #[error("No items in catalog fixture; currency unknown")]
    NoItems,

    /// Items do not form a valid catalog
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Fixture directory
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,
}

impl Fixture {
    /// Fixture directory at the default `./fixtures` path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Fixture directory at a custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Base path for fixture files
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Load `catalogs/<name>.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or does not form a
    /// valid catalog.
    pub fn catalog(&self, name: &str) -> Result<Catalog, FixtureError> {
        load_catalog(self.base_path.join("catalogs").join(format!("{name}.yml")))
    }

    /// Load `cases/<name>.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn cases(&self, name: &str) -> Result<Vec<OrderCase>, FixtureError> {
        let path = self.base_path.join("cases").join(format!("{name}.yml"));
        let contents = fs::read_to_string(path)?;

        cases::cases_from_str(&contents)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a catalog from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or does not form a valid
/// catalog.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, FixtureError> {
    let contents = fs::read_to_string(path)?;

    catalog_from_str(&contents)
}

/// Parse a catalog from YAML text.
///
/// # Errors
///
/// Returns an error if the text cannot be parsed or does not form a valid catalog.
pub fn catalog_from_str(contents: &str) -> Result<Catalog, FixtureError> {
    let fixture: CatalogFixture = serde_norway::from_str(contents)?;

    fixture.into_catalog()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    const CATALOG: &str = "\
items:
  - name: Cola(M)
    price: 7.00 HKD
  - name: Fries(M)
    price: 8.00 HKD
  - name: Snack
    price: 13.00 HKD
    food: [Fries(M), Cola(M)]
";

    const CASES: &str = "\
- [[Fries(M), Cola(M)], [Snack]]
- [[], []]
";

    fn write(dir: &Path, relative: &str, contents: &str) -> TestResult {
        let path = dir.join(relative);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::File::create(path)?.write_all(contents.as_bytes())?;

        Ok(())
    }

    #[test]
    fn loads_catalog_and_cases_from_base_path() -> TestResult {
        let dir = TempDir::new()?;
        write(dir.path(), "catalogs/snacks.yml", CATALOG)?;
        write(dir.path(), "cases/snacks.yml", CASES)?;

        let fixture = Fixture::with_base_path(dir.path());
        let catalog = fixture.catalog("snacks")?;
        let cases = fixture.cases("snacks")?;

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.item("Snack")?.price().to_minor_units(), 1300);
        assert_eq!(cases.len(), 2);
        assert_eq!(
            cases.first().map(|case| case.expected.clone()),
            Some(vec!["Snack".to_string()])
        );

        Ok(())
    }

    #[test]
    fn missing_file_is_an_io_error() -> TestResult {
        let dir = TempDir::new()?;
        let fixture = Fixture::with_base_path(dir.path());

        assert!(matches!(fixture.catalog("absent"), Err(FixtureError::Io(_))));

        Ok(())
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        assert!(matches!(
            catalog_from_str("items: [name: x"),
            Err(FixtureError::Yaml(_))
        ));
    }

    #[test]
    fn bundled_fastfood_catalog_loads() -> TestResult {
        let fixture = Fixture::with_base_path(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures"));
        let catalog = fixture.catalog("fastfood")?;

        assert_eq!(catalog.meals().count(), 2);
        assert_eq!(catalog.item("BigBurgerMeal")?.price().to_minor_units(), 2800);

        Ok(())
    }
}
