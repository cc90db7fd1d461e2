//! Units — physical units and unit-carrying quantities
//!
//! - **Unit**: symbol exponents with base-dimension reduction
//! - **Quantity**: a column of magnitudes with its unit
//! - **Registry**: symbols used by simulation parameters (g, mol, aa, s, ...)

mod unit;
mod quantity;
pub mod registry;

pub use unit::{Reduced, Unit};
pub use quantity::Quantity;
