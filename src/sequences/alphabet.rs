//! Alphabet — mapping from amino-acid letters to symbol indexes

use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};

/// Amino-acid one-letter codes in simulation order (selenocysteine `U` included)
pub const AMINO_ACID_CODES: &str = "ARNDCEQGHILKMFPSTWYUV";

/// Ordered set of symbols; a symbol's index is its encoded value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<char>", into = "Vec<char>")]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    pub fn new(symbols: impl IntoIterator<Item = char>) -> Result<Self> {
        let symbols: Vec<char> = symbols.into_iter().collect();
        for (i, c) in symbols.iter().enumerate() {
            if symbols[..i].contains(c) {
                return Err(DataError::schema(format!("duplicate alphabet symbol '{}'", c)));
            }
        }
        if symbols.len() > i8::MAX as usize {
            return Err(DataError::shape(format!(
                "alphabet of {} symbols does not fit i8 indexes",
                symbols.len()
            )));
        }
        Ok(Self { symbols })
    }

    /// The 21 proteinogenic amino acids used by the simulation
    pub fn amino_acids() -> Self {
        Self {
            symbols: AMINO_ACID_CODES.chars().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn index_of(&self, symbol: char) -> Result<i8> {
        self.symbols
            .iter()
            .position(|&c| c == symbol)
            .ok_or_else(|| DataError::lookup(format!("symbol '{}' is not in the alphabet", symbol)))
            .and_then(|i| {
                i8::try_from(i)
                    .map_err(|_| DataError::shape(format!("symbol index {} does not fit i8", i)))
            })
    }

    pub fn symbol_at(&self, index: i8) -> Option<char> {
        usize::try_from(index).ok().and_then(|i| self.symbols.get(i).copied())
    }

    /// Per-symbol occurrence counts of `sequence`, in alphabet order
    pub fn counts(&self, sequence: &str) -> Result<Vec<i64>> {
        let mut counts = vec![0i64; self.len()];
        for c in sequence.chars() {
            counts[self.index_of(c)? as usize] += 1;
        }
        Ok(counts)
    }
}

impl TryFrom<Vec<char>> for Alphabet {
    type Error = DataError;

    fn try_from(symbols: Vec<char>) -> Result<Self> {
        Alphabet::new(symbols)
    }
}

impl From<Alphabet> for Vec<char> {
    fn from(alphabet: Alphabet) -> Self {
        alphabet.symbols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amino_acids() {
        let aa = Alphabet::amino_acids();
        assert_eq!(aa.len(), 21);
        assert_eq!(aa.index_of('A').unwrap(), 0);
        assert_eq!(aa.index_of('V').unwrap(), 20);
        assert_eq!(aa.symbol_at(12), Some('M'));
        assert_eq!(aa.symbol_at(-1), None);
        assert!(matches!(aa.index_of('X'), Err(DataError::Lookup(_))));
    }

    #[test]
    fn test_duplicates_rejected() {
        assert!(Alphabet::new("ABA".chars()).is_err());
    }

    #[test]
    fn test_counts() {
        let aa = Alphabet::new("MKA".chars()).unwrap();
        assert_eq!(aa.counts("MAKAA").unwrap(), vec![1, 1, 3]);
        assert!(aa.counts("MZ").is_err());
    }

    #[test]
    fn test_serde_as_symbol_list() {
        let aa = Alphabet::amino_acids();
        let json = serde_json::to_string(&aa).unwrap();
        assert!(json.starts_with("[\"A\",\"R\""));
        let back: Alphabet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, aa);
    }

    #[test]
    fn test_deserialize_revalidates() {
        let oversized: Vec<char> = (0..256u32).filter_map(|i| char::from_u32(0x100 + i)).collect();
        let json = serde_json::to_string(&oversized).unwrap();
        assert!(serde_json::from_str::<Alphabet>(&json).is_err());

        assert!(serde_json::from_str::<Alphabet>(r#"["M","K","M"]"#).is_err());
    }
}
