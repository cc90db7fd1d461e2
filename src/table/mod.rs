//! Unit tables — fixed-schema columnar data with per-column physical units
//!
//! Simulation parameter tables (monomer data, RNA data, ...) are built once
//! from plain columns plus a unit tag per column. After construction every
//! read hands back unit-carrying values and every write is unit-checked.

mod column;
mod unit_table;

pub use column::{ColumnData, ColumnKind, Scalar};
pub use unit_table::{ColumnValue, Row, RowSelector, UnitTable, UnitTag};
