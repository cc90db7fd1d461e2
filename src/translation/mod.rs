//! Translation — protein monomer parameters for the simulation
//!
//! Builds the unit-checked monomer table, the padded amino-acid sequence
//! buffer (sized for one step of elongation past the longest protein plus a
//! lookahead slot), translation efficiencies and elongation-rate defaults.

mod data;
mod inputs;

pub use data::TranslationData;
pub use inputs::{HalfLives, MonomerRecord, TranslationInputs};
