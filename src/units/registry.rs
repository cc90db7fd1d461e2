//! Unit registry — the symbols used by simulation parameter tables
//!
//! Base dimensions are mass (`g`), amount (`mol`), time (`s`) and volume (`L`).
//! Molecule counts (`count`, `aa`, `nt`) are amounts scaled by 1/N_A, so a
//! column of amino-acid counts converts to moles and back.

use super::Unit;

/// Avogadro's number (1/mol)
pub const N_AVOGADRO: f64 = 6.022_140_76e23;

/// Definition of a symbol in base dimensions
#[derive(Debug, Clone)]
pub struct Definition {
    pub dimensions: Vec<(String, i32)>,
    pub scale: f64,
}

const KNOWN: &[(&str, &str, f64)] = &[
    // symbol, base dimension, scale
    ("g", "g", 1.0),
    ("kg", "g", 1e3),
    ("mg", "g", 1e-3),
    ("ug", "g", 1e-6),
    ("ng", "g", 1e-9),
    ("pg", "g", 1e-12),
    ("fg", "g", 1e-15),
    ("mol", "mol", 1.0),
    ("mmol", "mol", 1e-3),
    ("umol", "mol", 1e-6),
    ("nmol", "mol", 1e-9),
    ("count", "mol", 1.0 / N_AVOGADRO),
    ("aa", "mol", 1.0 / N_AVOGADRO),
    ("nt", "mol", 1.0 / N_AVOGADRO),
    ("s", "s", 1.0),
    ("min", "s", 60.0),
    ("h", "s", 3600.0),
    ("L", "L", 1.0),
    ("mL", "L", 1e-3),
    ("uL", "L", 1e-6),
    ("fL", "L", 1e-15),
];

/// Whether `symbol` is a registered unit symbol
pub fn is_known(symbol: &str) -> bool {
    KNOWN.iter().any(|(s, _, _)| *s == symbol)
}

/// Look up a symbol; an unregistered name maps to itself as a base dimension
pub fn definition(symbol: &str) -> Definition {
    match KNOWN.iter().find(|(s, _, _)| *s == symbol) {
        Some((_, base, scale)) => Definition {
            dimensions: vec![(base.to_string(), 1)],
            scale: *scale,
        },
        None => Definition {
            dimensions: vec![(symbol.to_string(), 1)],
            scale: 1.0,
        },
    }
}

pub fn gram() -> Unit {
    Unit::registered("g")
}
pub fn kilogram() -> Unit {
    Unit::registered("kg")
}
pub fn femtogram() -> Unit {
    Unit::registered("fg")
}
pub fn mole() -> Unit {
    Unit::registered("mol")
}
pub fn count() -> Unit {
    Unit::registered("count")
}
pub fn amino_acid() -> Unit {
    Unit::registered("aa")
}
pub fn nucleotide() -> Unit {
    Unit::registered("nt")
}
pub fn second() -> Unit {
    Unit::registered("s")
}
pub fn minute() -> Unit {
    Unit::registered("min")
}
pub fn hour() -> Unit {
    Unit::registered("h")
}
pub fn liter() -> Unit {
    Unit::registered("L")
}

/// g/mol, the unit of molecular weights
pub fn gram_per_mole() -> Unit {
    gram().divide(&mole())
}

/// 1/s, the unit of first-order rate constants
pub fn per_second() -> Unit {
    Unit::dimensionless().divide(&second())
}

/// aa/s, the unit of ribosome elongation rates
pub fn amino_acid_per_second() -> Unit {
    amino_acid().divide(&second())
}
