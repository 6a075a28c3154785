//! Combo
//!
//! Combo turns a customer's wanted foods into the cheapest order that still covers
//! them, substituting discounted meal bundles where they pay off.
//!
//! ```rust
//! use combo::{
//!     catalog::CatalogBuilder,
//!     solvers::{OrderMaker, TreeSearchSolver},
//! };
//! use rusty_money::iso::HKD;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut builder = CatalogBuilder::new(HKD);
//! builder
//!     .food("DoubleCheese", 1500)
//!     .food("Fries(M)", 800)
//!     .food("Cola(M)", 700)
//!     .meal("DoubleCheeseMeal", 2500, ["DoubleCheese", "Fries(M)", "Cola(M)"]);
//! let catalog = builder.build()?;
//!
//! let wanted = catalog.get(&["DoubleCheese", "Fries(M)", "Cola(M)"])?;
//! let order = TreeSearchSolver::new(&catalog).order(&wanted);
//!
//! assert_eq!(catalog.price(&order).to_minor_units(), 2500);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod fixtures;
pub mod items;
pub mod logging;
pub mod order;
pub mod receipt;
pub mod solvers;
