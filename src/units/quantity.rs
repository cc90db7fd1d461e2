//! Quantity — numeric values with a unit attached

use super::Unit;
use crate::error::{DataError, Result};
use crate::table::ColumnData;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A magnitude array expressed in a physical unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQuantity")]
pub struct Quantity {
    values: ColumnData,
    unit: Unit,
}

#[derive(Deserialize)]
struct RawQuantity {
    values: ColumnData,
    unit: Unit,
}

impl Quantity {
    /// Attach `unit` to numeric `values`. Text cannot carry a unit.
    pub fn new(values: ColumnData, unit: Unit) -> Result<Self> {
        if !values.is_numeric() {
            return Err(DataError::unit_mismatch(format!(
                "text values cannot carry unit {}",
                unit
            )));
        }
        Ok(Self { values, unit })
    }

    /// A single value in `unit`
    pub fn scalar(value: f64, unit: Unit) -> Self {
        Self {
            values: ColumnData::Float(vec![value]),
            unit,
        }
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Magnitude in the quantity's own unit
    pub fn as_number(&self) -> &ColumnData {
        &self.values
    }

    pub fn into_parts(self) -> (ColumnData, Unit) {
        (self.values, self.unit)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_compatible(&self, unit: &Unit) -> bool {
        self.unit.is_compatible(unit)
    }

    /// Magnitude expressed in `unit`
    pub fn as_number_in(&self, unit: &Unit) -> Result<ColumnData> {
        let factor = self.unit.conversion_factor(unit).ok_or_else(|| {
            DataError::unit_mismatch(format!("cannot express {} in {}", self.unit, unit))
        })?;
        self.values.scaled(factor)
    }

    /// Magnitudes in `unit` as floats
    pub fn values_in(&self, unit: &Unit) -> Result<Vec<f64>> {
        self.as_number_in(unit)?.to_f64_vec()
    }

    /// The single magnitude of a scalar quantity, in `unit`
    pub fn scalar_in(&self, unit: &Unit) -> Result<f64> {
        match self.values_in(unit)?.as_slice() {
            [x] => Ok(*x),
            other => Err(DataError::shape(format!(
                "expected a scalar quantity, found {} values",
                other.len()
            ))),
        }
    }

    /// The same quantity re-expressed in `unit`
    pub fn to(&self, unit: &Unit) -> Result<Quantity> {
        Ok(Quantity {
            values: self.as_number_in(unit)?,
            unit: unit.clone(),
        })
    }
}

impl std::ops::Mul<ColumnData> for Unit {
    type Output = Result<Quantity>;

    fn mul(self, values: ColumnData) -> Result<Quantity> {
        Quantity::new(values, self)
    }
}

impl std::ops::Mul<f64> for &Unit {
    type Output = Quantity;

    fn mul(self, value: f64) -> Quantity {
        Quantity::scalar(value, self.clone())
    }
}

impl std::ops::Mul<f64> for Quantity {
    type Output = Result<Quantity>;

    fn mul(self, factor: f64) -> Result<Quantity> {
        Ok(Quantity {
            values: self.values.scaled(factor)?,
            unit: self.unit,
        })
    }
}

impl TryFrom<RawQuantity> for Quantity {
    type Error = DataError;

    fn try_from(raw: RawQuantity) -> Result<Self> {
        Quantity::new(raw.values, raw.unit)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} [{}]", self.values, self.unit)
    }
}
