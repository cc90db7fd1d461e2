//! UnitTable — a fixed-schema columnar table with a unit on every column
//!
//! Every column is tagged with a unit or explicitly marked unitless. Reads of
//! unit columns hand back a `Quantity`, never a bare number, and writes must
//! keep each column's unit consistent.

use super::column::{ColumnData, Scalar};
use crate::error::{DataError, Result};
use crate::units::{Quantity, Unit};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::ops::Range;

/// Unit designation of a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<Unit>", into = "Option<Unit>")]
pub enum UnitTag {
    Unit(Unit),
    Unitless,
}

impl UnitTag {
    pub fn unit(&self) -> Option<&Unit> {
        match self {
            UnitTag::Unit(u) => Some(u),
            UnitTag::Unitless => None,
        }
    }

    pub fn has_unit(&self) -> bool {
        matches!(self, UnitTag::Unit(_))
    }
}

impl From<Unit> for UnitTag {
    fn from(unit: Unit) -> Self {
        UnitTag::Unit(unit)
    }
}

impl From<Option<Unit>> for UnitTag {
    fn from(unit: Option<Unit>) -> Self {
        unit.map_or(UnitTag::Unitless, UnitTag::Unit)
    }
}

impl From<UnitTag> for Option<Unit> {
    fn from(tag: UnitTag) -> Self {
        match tag {
            UnitTag::Unit(u) => Some(u),
            UnitTag::Unitless => None,
        }
    }
}

impl fmt::Display for UnitTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitTag::Unit(u) => write!(f, "{}", u),
            UnitTag::Unitless => write!(f, "None"),
        }
    }
}

/// A value read from or written to a column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    /// Values with a unit attached
    Quantity(Quantity),
    /// Plain values without a unit
    Array(ColumnData),
    /// A bare number; never assignable to a column
    Scalar(f64),
}

impl From<Quantity> for ColumnValue {
    fn from(q: Quantity) -> Self {
        ColumnValue::Quantity(q)
    }
}

impl From<ColumnData> for ColumnValue {
    fn from(data: ColumnData) -> Self {
        ColumnValue::Array(data)
    }
}

/// Row selection for `UnitTable::subset`
#[derive(Debug, Clone, PartialEq)]
pub enum RowSelector {
    /// Contiguous rows; the end is clipped to the row count
    Range(Range<usize>),
    /// One flag per row
    Mask(Vec<bool>),
    /// Explicit row indexes, in output order
    Indices(Vec<usize>),
}

impl RowSelector {
    fn resolve(&self, n_rows: usize) -> Result<Vec<usize>> {
        match self {
            RowSelector::Range(range) => {
                let end = range.end.min(n_rows);
                Ok((range.start.min(end)..end).collect())
            }
            RowSelector::Mask(mask) => {
                if mask.len() != n_rows {
                    return Err(DataError::shape(format!(
                        "mask has {} entries for {} rows",
                        mask.len(),
                        n_rows
                    )));
                }
                Ok(mask.iter().enumerate().filter(|(_, &m)| m).map(|(i, _)| i).collect())
            }
            RowSelector::Indices(indexes) => {
                if let Some(&bad) = indexes.iter().find(|&&i| i >= n_rows) {
                    return Err(DataError::shape(format!(
                        "row index {} out of bounds for {} rows",
                        bad, n_rows
                    )));
                }
                Ok(indexes.clone())
            }
        }
    }
}

/// One raw table row, fields in schema order, no units attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    fields: Vec<(String, Scalar)>,
}

impl Row {
    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.fields.iter().map(|(_, v)| v.to_string()).collect();
        write!(f, "({})", values.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Field {
    name: String,
    data: ColumnData,
    unit: UnitTag,
}

/// Serialized layout; validated again on the way back in
#[derive(Serialize, Deserialize)]
struct RawUnitTable {
    columns: Vec<(String, ColumnData)>,
    units: BTreeMap<String, UnitTag>,
}

/// Columnar table whose columns carry enforced physical units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawUnitTable", into = "RawUnitTable")]
pub struct UnitTable {
    fields: Vec<Field>,
    n_rows: usize,
}

impl UnitTable {
    /// Build a table from columns (schema order) and a unit tag per column name
    pub fn new(
        columns: Vec<(String, ColumnData)>,
        units: HashMap<String, UnitTag>,
    ) -> Result<Self> {
        let mut names = BTreeSet::new();
        if let Some((dup, _)) = columns.iter().find(|(n, _)| !names.insert(n.as_str())) {
            return Err(DataError::schema(format!("duplicate column '{}'", dup)));
        }
        let unit_names: BTreeSet<&str> = units.keys().map(String::as_str).collect();
        if names != unit_names {
            let missing: Vec<&str> = names.difference(&unit_names).copied().collect();
            let extra: Vec<&str> = unit_names.difference(&names).copied().collect();
            return Err(DataError::schema(format!(
                "column fields do not match unit fields (missing units: {:?}, extra units: {:?})",
                missing, extra
            )));
        }

        let n_rows = columns.first().map_or(0, |(_, data)| data.len());
        if let Some((name, data)) = columns.iter().find(|(_, d)| d.len() != n_rows) {
            return Err(DataError::shape(format!(
                "mismatched input types: column '{}' has {} rows, expected {}",
                name,
                data.len(),
                n_rows
            )));
        }

        let mut units = units;
        let mut fields = Vec::with_capacity(columns.len());
        for (name, data) in columns {
            let unit = units.remove(&name).unwrap_or(UnitTag::Unitless);
            if unit.has_unit() && !data.is_numeric() {
                return Err(DataError::unit_mismatch(format!(
                    "text column '{}' cannot carry unit {}",
                    name, unit
                )));
            }
            fields.push(Field { name, data, unit });
        }

        debug!("Built unit table: {} columns x {} rows", fields.len(), n_rows);
        Ok(Self { fields, n_rows })
    }

    fn field(&self, name: &str) -> Result<&Field> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| DataError::lookup(format!("no column named '{}'", name)))
    }

    fn field_mut(&mut self, name: &str) -> Result<&mut Field> {
        self.fields
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| DataError::lookup(format!("no column named '{}'", name)))
    }

    /// Read a column: raw values if unitless, a `Quantity` otherwise
    pub fn column(&self, name: &str) -> Result<ColumnValue> {
        let field = self.field(name)?;
        match &field.unit {
            UnitTag::Unitless => Ok(ColumnValue::Array(field.data.clone())),
            UnitTag::Unit(unit) => Ok(ColumnValue::Quantity(Quantity::new(
                field.data.clone(),
                unit.clone(),
            )?)),
        }
    }

    /// Read a unit column as a quantity; fails on unitless columns
    pub fn quantity(&self, name: &str) -> Result<Quantity> {
        match self.column(name)? {
            ColumnValue::Quantity(q) => Ok(q),
            _ => Err(DataError::unit_mismatch(format!("column '{}' is unitless", name))),
        }
    }

    /// Borrow a unitless column; fails on unit columns
    pub fn array(&self, name: &str) -> Result<&ColumnData> {
        let field = self.field(name)?;
        match &field.unit {
            UnitTag::Unitless => Ok(&field.data),
            UnitTag::Unit(unit) => Err(DataError::unit_mismatch(format!(
                "column '{}' carries unit {}; read it as a quantity",
                name, unit
            ))),
        }
    }

    /// Overwrite a column, keeping its unit designation consistent
    pub fn set_column(&mut self, name: &str, value: impl Into<ColumnValue>) -> Result<()> {
        let n_rows = self.n_rows;
        let field = self.field_mut(name)?;
        let (data, unit) = match value.into() {
            ColumnValue::Quantity(q) => {
                match &field.unit {
                    UnitTag::Unit(current) if current.is_compatible(q.unit()) => {}
                    UnitTag::Unit(current) => {
                        return Err(DataError::unit_mismatch(format!(
                            "column '{}' is in {}, cannot assign {}",
                            name,
                            current,
                            q.unit()
                        )))
                    }
                    UnitTag::Unitless => {
                        return Err(DataError::unit_mismatch(format!(
                            "column '{}' is unitless, cannot assign a value in {}",
                            name,
                            q.unit()
                        )))
                    }
                }
                let (data, unit) = q.into_parts();
                (data, UnitTag::Unit(unit))
            }
            ColumnValue::Array(data) => {
                if let UnitTag::Unit(current) = &field.unit {
                    return Err(DataError::unit_mismatch(format!(
                        "column '{}' has unit {} that the assigned array does not",
                        name, current
                    )));
                }
                (data, UnitTag::Unitless)
            }
            ColumnValue::Scalar(x) => {
                return Err(DataError::UnsupportedType(format!(
                    "cannot assign bare number {} to column '{}'; use a quantity or an array",
                    x, name
                )))
            }
        };

        if data.len() != n_rows {
            return Err(DataError::shape(format!(
                "column '{}' has {} rows, assigned value has {}",
                name,
                n_rows,
                data.len()
            )));
        }
        field.data = data.cast_like(&field.data)?;
        field.unit = unit;
        Ok(())
    }

    /// One raw row for inspection
    pub fn row(&self, index: usize) -> Result<Row> {
        if index >= self.n_rows {
            return Err(DataError::shape(format!(
                "row index {} out of bounds for {} rows",
                index, self.n_rows
            )));
        }
        let fields = self
            .fields
            .iter()
            .filter_map(|f| f.data.get(index).map(|v| (f.name.clone(), v)))
            .collect();
        Ok(Row { fields })
    }

    /// A new table over the selected rows with the same schema and unit tags
    pub fn subset(&self, selector: &RowSelector) -> Result<UnitTable> {
        let indexes = selector.resolve(self.n_rows)?;
        let fields = self
            .fields
            .iter()
            .map(|f| Field {
                name: f.name.clone(),
                data: f.data.select(&indexes),
                unit: f.unit.clone(),
            })
            .collect();
        Ok(UnitTable {
            fields,
            n_rows: indexes.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.n_rows
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn unit_of(&self, name: &str) -> Result<&UnitTag> {
        Ok(&self.field(name)?.unit)
    }

    /// All raw columns in schema order, units stripped
    pub fn full_array(&self) -> Vec<(&str, &ColumnData)> {
        self.fields.iter().map(|f| (f.name.as_str(), &f.data)).collect()
    }

    /// Unit tag of every column
    pub fn full_units(&self) -> BTreeMap<String, UnitTag> {
        self.fields.iter().map(|f| (f.name.clone(), f.unit.clone())).collect()
    }
}

impl TryFrom<RawUnitTable> for UnitTable {
    type Error = DataError;

    fn try_from(raw: RawUnitTable) -> Result<Self> {
        UnitTable::new(raw.columns, raw.units.into_iter().collect())
    }
}

impl From<UnitTable> for RawUnitTable {
    fn from(table: UnitTable) -> Self {
        let units = table.full_units();
        let columns = table.fields.into_iter().map(|f| (f.name, f.data)).collect();
        RawUnitTable { columns, units }
    }
}

impl fmt::Display for UnitTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "STRUCTURED ARRAY:")?;
        let header: Vec<&str> = self.column_names().collect();
        writeln!(f, "[({})", header.join(", "))?;
        for i in 0..self.n_rows {
            if let Ok(row) = self.row(i) {
                writeln!(f, " {}", row)?;
            }
        }
        writeln!(f, "]")?;
        writeln!(f, "UNITS:")?;
        let units: Vec<String> = self
            .fields
            .iter()
            .map(|field| format!("{}: {}", field.name, field.unit))
            .collect();
        write!(f, "{{{}}}", units.join(", "))
    }
}
