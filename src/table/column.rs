//! Column storage for unit tables
//!
//! Each column is a homogeneous array with one element per row. Per-row
//! vectors (e.g. amino-acid counts) are held as an `n_rows × width` matrix.

use crate::error::{DataError, Result};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A homogeneous column of table data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnData {
    Float(Vec<f64>),
    Int(Vec<i64>),
    Text(Vec<String>),
    /// Fixed-width integer vector per row
    IntRows(DMatrix<i64>),
    /// Fixed-width float vector per row
    FloatRows(DMatrix<f64>),
}

/// Element kind of a column, used for schema comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Float,
    Int,
    Text,
    IntRows { width: usize },
    FloatRows { width: usize },
}

/// A single element of a column, as returned in raw rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Float(f64),
    Int(i64),
    Text(String),
    IntVec(Vec<i64>),
    FloatVec(Vec<f64>),
}

impl ColumnData {
    /// Build a per-row integer vector column; every row must have the same width
    pub fn int_rows(rows: &[Vec<i64>], width: usize) -> Result<Self> {
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(DataError::shape(format!(
                "row {} has {} elements, expected {}",
                i,
                row.len(),
                width
            )));
        }
        Ok(Self::IntRows(DMatrix::from_fn(rows.len(), width, |i, j| rows[i][j])))
    }

    pub fn text<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::Text(values.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Text(v) => v.len(),
            Self::IntRows(m) => m.nrows(),
            Self::FloatRows(m) => m.nrows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Float(_) => ColumnKind::Float,
            Self::Int(_) => ColumnKind::Int,
            Self::Text(_) => ColumnKind::Text,
            Self::IntRows(m) => ColumnKind::IntRows { width: m.ncols() },
            Self::FloatRows(m) => ColumnKind::FloatRows { width: m.ncols() },
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Text(_))
    }

    /// Raw element at `row`
    pub fn get(&self, row: usize) -> Option<Scalar> {
        if row >= self.len() {
            return None;
        }
        Some(match self {
            Self::Float(v) => Scalar::Float(v[row]),
            Self::Int(v) => Scalar::Int(v[row]),
            Self::Text(v) => Scalar::Text(v[row].clone()),
            Self::IntRows(m) => Scalar::IntVec(m.row(row).iter().copied().collect()),
            Self::FloatRows(m) => Scalar::FloatVec(m.row(row).iter().copied().collect()),
        })
    }

    /// Gather rows by index; indexes must already be in range
    pub(crate) fn select(&self, indexes: &[usize]) -> Self {
        match self {
            Self::Float(v) => Self::Float(indexes.iter().map(|&i| v[i]).collect()),
            Self::Int(v) => Self::Int(indexes.iter().map(|&i| v[i]).collect()),
            Self::Text(v) => Self::Text(indexes.iter().map(|&i| v[i].clone()).collect()),
            Self::IntRows(m) => Self::IntRows(m.select_rows(indexes.iter())),
            Self::FloatRows(m) => Self::FloatRows(m.select_rows(indexes.iter())),
        }
    }

    /// Multiply every element by `factor`. Integer data stays integer only for a factor of one.
    pub fn scaled(&self, factor: f64) -> Result<Self> {
        if factor == 1.0 {
            return match self {
                Self::Text(_) => Err(DataError::type_mismatch("text column cannot be scaled")),
                other => Ok(other.clone()),
            };
        }
        match self {
            Self::Float(v) => Ok(Self::Float(v.iter().map(|x| x * factor).collect())),
            Self::Int(v) => Ok(Self::Float(v.iter().map(|&x| x as f64 * factor).collect())),
            Self::IntRows(m) => Ok(Self::FloatRows(m.map(|x| x as f64 * factor))),
            Self::FloatRows(m) => Ok(Self::FloatRows(m * factor)),
            Self::Text(_) => Err(DataError::type_mismatch("text column cannot be scaled")),
        }
    }

    /// Cast `self` into the element kind of `target`, widening integers to floats
    pub(crate) fn cast_like(self, target: &ColumnData) -> Result<Self> {
        match (self, target.kind()) {
            (Self::Int(v), ColumnKind::Float) => {
                Ok(Self::Float(v.into_iter().map(|x| x as f64).collect()))
            }
            (Self::IntRows(m), ColumnKind::FloatRows { width }) if m.ncols() == width => {
                Ok(Self::FloatRows(m.map(|x| x as f64)))
            }
            (data, kind) if data.kind() == kind => Ok(data),
            (data, kind) => Err(DataError::type_mismatch(format!(
                "cannot store {:?} data in a {:?} column",
                data.kind(),
                kind
            ))),
        }
    }

    /// Float view of a numeric column, flattened row-major for per-row vectors
    pub fn to_f64_vec(&self) -> Result<Vec<f64>> {
        match self {
            Self::Float(v) => Ok(v.clone()),
            Self::Int(v) => Ok(v.iter().map(|&x| x as f64).collect()),
            Self::IntRows(m) => Ok(m.transpose().iter().map(|&x| x as f64).collect()),
            Self::FloatRows(m) => Ok(m.transpose().iter().copied().collect()),
            Self::Text(_) => Err(DataError::type_mismatch("text column has no numeric values")),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Int(x) => write!(f, "{}", x),
            Scalar::Text(s) => write!(f, "'{}'", s),
            Scalar::IntVec(v) => write!(f, "{:?}", v),
            Scalar::FloatVec(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<Vec<f64>> for ColumnData {
    fn from(v: Vec<f64>) -> Self {
        Self::Float(v)
    }
}

impl From<Vec<i64>> for ColumnData {
    fn from(v: Vec<i64>) -> Self {
        Self::Int(v)
    }
}

impl From<Vec<String>> for ColumnData {
    fn from(v: Vec<String>) -> Self {
        Self::Text(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_rows_width_check() {
        let ok = ColumnData::int_rows(&[vec![1, 2], vec![3, 4]], 2).unwrap();
        assert_eq!(ok.kind(), ColumnKind::IntRows { width: 2 });
        assert_eq!(ok.get(1), Some(Scalar::IntVec(vec![3, 4])));
        assert!(ColumnData::int_rows(&[vec![1, 2], vec![3]], 2).is_err());
    }

    #[test]
    fn test_select_rows() {
        let counts = ColumnData::int_rows(&[vec![1, 2], vec![3, 4], vec![5, 6]], 2).unwrap();
        let picked = counts.select(&[2, 0]);
        assert_eq!(picked, ColumnData::int_rows(&[vec![5, 6], vec![1, 2]], 2).unwrap());

        let names = ColumnData::text(["a", "b", "c"]);
        assert_eq!(names.select(&[1]), ColumnData::text(["b"]));
    }

    #[test]
    fn test_scaled_widens_integers() {
        let lengths = ColumnData::Int(vec![1, 2]);
        assert_eq!(lengths.scaled(1.0).unwrap(), lengths);
        assert_eq!(lengths.scaled(0.5).unwrap(), ColumnData::Float(vec![0.5, 1.0]));
        assert!(ColumnData::text(["x"]).scaled(2.0).is_err());
    }

    #[test]
    fn test_cast_like() {
        let target = ColumnData::Float(vec![0.0]);
        let cast = ColumnData::Int(vec![3]).cast_like(&target).unwrap();
        assert_eq!(cast, ColumnData::Float(vec![3.0]));
        assert!(ColumnData::Float(vec![1.5]).cast_like(&ColumnData::Int(vec![0])).is_err());
        assert!(ColumnData::text(["x"]).cast_like(&target).is_err());
    }

    #[test]
    fn test_flattened_rows() {
        let counts = ColumnData::int_rows(&[vec![1, 2], vec![3, 4]], 2).unwrap();
        assert_eq!(counts.to_f64_vec().unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
    }
}
