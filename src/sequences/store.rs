//! SequenceStore — padded amino-acid index sequences with compact persistence
//!
//! In memory the sequences live in a rectangular `n × width` buffer filled
//! with `PAD_VALUE` past each sequence's end. Serialization writes only the
//! compacted rows plus the buffer shape; deserialization rebuilds the buffer.

use super::alphabet::Alphabet;
use super::codec::{compact, reconstruct, CompactSequences, PAD_VALUE};
use crate::error::{DataError, Result};
use log::info;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Width of the padded buffer
///
/// `total = max_length + elongation_margin + lookahead`. The margin absorbs
/// elongation past the nominal longest sequence within one time step; the
/// lookahead slot lets readers peek at the symbol after the last elongated
/// position without a bounds check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferWidth {
    pub max_length: usize,
    pub elongation_margin: usize,
    pub lookahead: usize,
}

impl BufferWidth {
    pub fn new(max_length: usize, elongation_margin: usize, lookahead: usize) -> Self {
        Self {
            max_length,
            elongation_margin,
            lookahead,
        }
    }

    pub fn total(&self) -> usize {
        self.max_length + self.elongation_margin + self.lookahead
    }
}

/// Padded sequence buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "CompactSequences", try_from = "CompactSequences")]
pub struct SequenceStore {
    padded: DMatrix<i8>,
}

impl SequenceStore {
    /// Encode letter sequences through `alphabet` into a buffer of `width.total()` columns
    pub fn encode<S: AsRef<str>>(
        sequences: &[S],
        alphabet: &Alphabet,
        width: BufferWidth,
    ) -> Result<Self> {
        let n_cols = width.total();
        let mut padded = DMatrix::from_element(sequences.len(), n_cols, PAD_VALUE);
        for (i, seq) in sequences.iter().enumerate() {
            let seq = seq.as_ref();
            let len = seq.chars().count();
            if len > width.max_length {
                return Err(DataError::shape(format!(
                    "sequence {} has length {}, longer than the nominal maximum {}",
                    i, len, width.max_length
                )));
            }
            for (j, letter) in seq.chars().enumerate() {
                padded[(i, j)] = alphabet.index_of(letter)?;
            }
        }
        info!(
            "Encoded {} sequences into a {}x{} buffer",
            sequences.len(),
            sequences.len(),
            n_cols
        );
        Ok(Self { padded })
    }

    /// Wrap an existing padded buffer
    pub fn from_padded(padded: DMatrix<i8>) -> Self {
        Self { padded }
    }

    pub fn from_compact(compacted: &CompactSequences) -> Result<Self> {
        Ok(Self {
            padded: reconstruct(&compacted.rows, compacted.shape, PAD_VALUE)?,
        })
    }

    pub fn compact(&self) -> CompactSequences {
        compact(&self.padded, PAD_VALUE)
    }

    pub fn padded(&self) -> &DMatrix<i8> {
        &self.padded
    }

    pub fn shape(&self) -> (usize, usize) {
        self.padded.shape()
    }

    pub fn len(&self) -> usize {
        self.padded.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.padded.nrows() == 0
    }

    pub fn width(&self) -> usize {
        self.padded.ncols()
    }

    /// Symbol at (`row`, `col`); `PAD_VALUE` past the sequence end
    pub fn symbol(&self, row: usize, col: usize) -> Option<i8> {
        self.padded.get((row, col)).copied()
    }

    /// Number of symbols before the first pad in `row`
    pub fn true_length(&self, row: usize) -> Option<usize> {
        if row >= self.len() {
            return None;
        }
        Some(self.padded.row(row).iter().take_while(|&&x| x != PAD_VALUE).count())
    }

    /// Content of `row` without padding
    pub fn sequence(&self, row: usize) -> Option<Vec<i8>> {
        if row >= self.len() {
            return None;
        }
        Some(
            self.padded
                .row(row)
                .iter()
                .copied()
                .take_while(|&x| x != PAD_VALUE)
                .collect(),
        )
    }
}

impl From<SequenceStore> for CompactSequences {
    fn from(store: SequenceStore) -> Self {
        store.compact()
    }
}

impl TryFrom<CompactSequences> for SequenceStore {
    type Error = DataError;

    fn try_from(compacted: CompactSequences) -> Result<Self> {
        SequenceStore::from_compact(&compacted)
    }
}
