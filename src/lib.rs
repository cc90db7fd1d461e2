//! cellsim-tables — unit-checked parameter data for whole-cell simulation
//!
//! Typed containers that carry physical units and compact sequence storage,
//! used to hand parameters from the knowledge base to the simulation.

pub mod config;
pub mod elongation;
pub mod error;
pub mod sequences;
pub mod storage;
pub mod table;
pub mod translation;
pub mod units;

pub use config::TranslationConfig;
pub use elongation::{make_elongation_rates, FixedRates, RatePolicy, UniformJitter};
pub use error::{DataError, Result};
pub use sequences::{CompactSequences, SequenceStore, PAD_VALUE};
pub use storage::ParameterArchive;
pub use table::{ColumnData, ColumnValue, RowSelector, UnitTable, UnitTag};
pub use translation::{TranslationData, TranslationInputs};
pub use units::{Quantity, Unit};
