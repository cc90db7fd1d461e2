//! Sequences — ragged integer sequences in a fixed-stride padded buffer
//!
//! - **Codec**: compaction (strip padding) and reconstruction (re-pad)
//! - **Alphabet**: letter → symbol index encoding
//! - **Store**: the padded buffer, persisted in compact form

mod alphabet;
mod codec;
mod store;

pub use alphabet::{Alphabet, AMINO_ACID_CODES};
pub use codec::{compact, reconstruct, CompactSequences, PAD_VALUE};
pub use store::{BufferWidth, SequenceStore};
