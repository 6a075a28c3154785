//! Order Case Fixtures

use serde::Deserialize;

use crate::fixtures::FixtureError;

/// A wanted list paired with an order of the expected price
///
/// Written in YAML as a two-element list: `[[wanted names], [expected names]]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(Vec<String>, Vec<String>)")]
pub struct OrderCase {
    /// Names the customer asks for
    pub wanted: Vec<String>,

    /// Names of an optimal order; only its total is binding
    pub expected: Vec<String>,
}

impl From<(Vec<String>, Vec<String>)> for OrderCase {
    fn from((wanted, expected): (Vec<String>, Vec<String>)) -> Self {
        Self { wanted, expected }
    }
}

/// Parse order cases from YAML text.
///
/// # Errors
///
/// Returns an error if the text is not a list of name-list pairs.
pub fn cases_from_str(contents: &str) -> Result<Vec<OrderCase>, FixtureError> {
    Ok(serde_norway::from_str(contents)?)
}
