//! Ragged sequence codec — padded rectangle ⇄ compact per-row vectors
//!
//! Padding is assumed monotonic per row: once the pad value appears, the rest
//! of the row is padding. Compaction cuts each row at its first pad value, so
//! a row whose real content resumed after a pad would lose that tail. Callers
//! building the padded buffer guarantee the pad value is never a content
//! symbol.

use crate::error::{DataError, Result};
use log::debug;
use nalgebra::{DMatrix, Scalar};
use serde::{Deserialize, Serialize};

/// Pad value for amino-acid index sequences
pub const PAD_VALUE: i8 = -1;

/// Compacted form of a padded sequence matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactSequences<T = i8> {
    /// True content of each row, padding stripped
    pub rows: Vec<Vec<T>>,
    /// (rows, columns) of the padded matrix
    pub shape: (usize, usize),
}

/// Strip each row at its first `pad` occurrence
pub fn compact<T: Scalar + Copy>(padded: &DMatrix<T>, pad: T) -> CompactSequences<T> {
    let rows: Vec<Vec<T>> = padded
        .row_iter()
        .map(|row| row.iter().copied().take_while(|&x| x != pad).collect())
        .collect();
    let stored: usize = rows.iter().map(Vec::len).sum();
    debug!(
        "Compacted {}x{} sequence matrix to {} symbols",
        padded.nrows(),
        padded.ncols(),
        stored
    );
    CompactSequences {
        rows,
        shape: padded.shape(),
    }
}

/// Rebuild the padded matrix: fill with `pad`, then write each row from column 0
pub fn reconstruct<T: Scalar + Copy>(
    rows: &[Vec<T>],
    shape: (usize, usize),
    pad: T,
) -> Result<DMatrix<T>> {
    let (n_rows, n_cols) = shape;
    if rows.len() > n_rows {
        return Err(DataError::shape(format!(
            "{} compacted rows do not fit a matrix with {} rows",
            rows.len(),
            n_rows
        )));
    }
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() > n_cols) {
        return Err(DataError::shape(format!(
            "compacted row {} has length {}, wider than {} columns",
            i,
            row.len(),
            n_cols
        )));
    }

    let mut padded = DMatrix::from_element(n_rows, n_cols, pad);
    for (i, row) in rows.iter().enumerate() {
        for (j, &symbol) in row.iter().enumerate() {
            padded[(i, j)] = symbol;
        }
    }
    debug!("Reconstructed {}x{} sequence matrix", n_rows, n_cols);
    Ok(padded)
}

impl<T: Scalar + Copy> CompactSequences<T> {
    pub fn from_padded(padded: &DMatrix<T>, pad: T) -> Self {
        compact(padded, pad)
    }

    pub fn expand(&self, pad: T) -> Result<DMatrix<T>> {
        reconstruct(&self.rows, self.shape, pad)
    }

    /// Number of stored content symbols
    pub fn symbol_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> DMatrix<i8> {
        DMatrix::from_row_slice(2, 4, &[1, 2, 9, 9, 3, 9, 9, 9])
    }

    #[test]
    fn test_compact_example() {
        let c = compact(&example(), 9);
        assert_eq!(c.rows, vec![vec![1, 2], vec![3]]);
        assert_eq!(c.shape, (2, 4));
        assert_eq!(c.symbol_count(), 3);
    }

    #[test]
    fn test_round_trip_example() {
        let m = example();
        let c = compact(&m, 9);
        assert_eq!(reconstruct(&c.rows, c.shape, 9).unwrap(), m);
    }

    #[test]
    fn test_round_trip_ragged_rows() {
        let m = DMatrix::from_row_slice(
            4,
            5,
            &[
                0, 1, 2, 3, 4, //
                5, PAD_VALUE, PAD_VALUE, PAD_VALUE, PAD_VALUE, //
                PAD_VALUE, PAD_VALUE, PAD_VALUE, PAD_VALUE, PAD_VALUE, //
                19, 18, 17, PAD_VALUE, PAD_VALUE,
            ],
        );
        let c = CompactSequences::from_padded(&m, PAD_VALUE);
        assert_eq!(c.rows[0].len(), 5);
        assert!(c.rows[2].is_empty());
        assert_eq!(c.expand(PAD_VALUE).unwrap(), m);
    }

    #[test]
    fn test_trims_from_first_pad() {
        // content after a pad is not preserved
        let m = DMatrix::from_row_slice(1, 4, &[1, PAD_VALUE, 2, PAD_VALUE]);
        let c = compact(&m, PAD_VALUE);
        assert_eq!(c.rows, vec![vec![1]]);
        let back = c.expand(PAD_VALUE).unwrap();
        assert_eq!(back, DMatrix::from_row_slice(1, 4, &[1, PAD_VALUE, PAD_VALUE, PAD_VALUE]));
    }

    #[test]
    fn test_row_too_long() {
        let err = reconstruct(&[vec![1i8, 2, 3]], (1, 2), PAD_VALUE).unwrap_err();
        assert!(matches!(err, DataError::Shape(_)));
        assert!(reconstruct(&[vec![1i8], vec![2]], (1, 2), PAD_VALUE).is_err());
    }

    #[test]
    fn test_missing_rows_stay_padded() {
        let m = reconstruct(&[vec![4i8, 5]], (3, 3), PAD_VALUE).unwrap();
        assert_eq!(
            m,
            DMatrix::from_row_slice(
                3,
                3,
                &[
                    4, 5, PAD_VALUE, //
                    PAD_VALUE, PAD_VALUE, PAD_VALUE, //
                    PAD_VALUE, PAD_VALUE, PAD_VALUE,
                ],
            )
        );
        let c = compact(&m, PAD_VALUE);
        let expected: Vec<Vec<i8>> = vec![vec![4, 5], vec![], vec![]];
        assert_eq!(c.rows, expected);
    }

    #[test]
    fn test_empty_matrix() {
        let m: DMatrix<i8> = DMatrix::from_element(0, 3, PAD_VALUE);
        let c = compact(&m, PAD_VALUE);
        assert!(c.rows.is_empty());
        assert_eq!(c.expand(PAD_VALUE).unwrap(), m);
    }
}
