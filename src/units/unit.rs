//! Unit — a physical unit expressed as a product of named symbols
//!
//! A unit is stored as symbol exponents, e.g. `{"g": 1, "mol": -1}` = g/mol.
//! Symbols keep their identity (amino acids stay `aa`, not `mol`), while
//! compatibility and conversion go through the base-dimension definitions in
//! the registry.

use super::registry;
use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A physical unit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Unit {
    /// Symbol exponents, zero exponents removed
    factors: BTreeMap<String, i32>,
}

/// A unit reduced to base dimensions plus the scale to those base units
#[derive(Debug, Clone, PartialEq)]
pub struct Reduced {
    pub dimensions: BTreeMap<String, i32>,
    pub scale: f64,
}

impl Unit {
    /// The unit of a pure number
    pub fn dimensionless() -> Self {
        Self { factors: BTreeMap::new() }
    }

    /// A single registered symbol with exponent one, e.g. `Unit::symbol("aa")`
    pub fn symbol(name: &str) -> Result<Self> {
        if !registry::is_known(name) {
            return Err(DataError::lookup(format!("unknown unit symbol '{}'", name)));
        }
        Ok(Self::registered(name))
    }

    /// Callers guarantee `name` is in the registry
    pub(super) fn registered(name: &str) -> Self {
        let mut factors = BTreeMap::new();
        factors.insert(name.to_string(), 1);
        Self { factors }
    }

    pub fn factors(&self) -> &BTreeMap<String, i32> {
        &self.factors
    }

    pub fn multiply(&self, other: &Unit) -> Unit {
        let mut factors = self.factors.clone();
        for (symbol, power) in &other.factors {
            *factors.entry(symbol.clone()).or_insert(0) += power;
        }
        factors.retain(|_, v| *v != 0);
        Unit { factors }
    }

    pub fn divide(&self, other: &Unit) -> Unit {
        self.multiply(&other.power(-1))
    }

    pub fn power(&self, n: i32) -> Unit {
        let factors = self
            .factors
            .iter()
            .map(|(k, v)| (k.clone(), v * n))
            .filter(|(_, v)| *v != 0)
            .collect();
        Unit { factors }
    }

    pub fn is_dimensionless(&self) -> bool {
        self.reduce().dimensions.is_empty()
    }

    /// Reduce to base dimensions using the registry definitions
    pub fn reduce(&self) -> Reduced {
        let mut dimensions = BTreeMap::new();
        let mut scale = 1.0;
        for (symbol, power) in &self.factors {
            let def = registry::definition(symbol);
            for (base, exp) in def.dimensions {
                *dimensions.entry(base.to_string()).or_insert(0) += exp * power;
            }
            scale *= def.scale.powi(*power);
        }
        dimensions.retain(|_, v| *v != 0);
        Reduced { dimensions, scale }
    }

    /// True when both units measure the same physical dimension
    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.reduce().dimensions == other.reduce().dimensions
    }

    /// Factor `f` such that `x [self] == x * f [to]`
    pub fn conversion_factor(&self, to: &Unit) -> Option<f64> {
        if self == to {
            return Some(1.0);
        }
        let from = self.reduce();
        let target = to.reduce();
        if from.dimensions != target.dimensions {
            return None;
        }
        Some(from.scale / target.scale)
    }

    /// Convert a single magnitude into `to`
    pub fn convert(&self, value: f64, to: &Unit) -> Result<f64> {
        let factor = self.conversion_factor(to).ok_or_else(|| {
            DataError::unit_mismatch(format!("cannot convert {} to {}", self, to))
        })?;
        Ok(value * factor)
    }

    /// Parse expressions like `g/mol`, `1/s`, `aa*s^-1`, `fg`
    pub fn parse(expr: &str) -> Result<Unit> {
        let expr = expr.trim();
        if expr.is_empty() {
            return Err(DataError::lookup("empty unit expression"));
        }
        let mut parts = expr.split('/');
        let mut unit = Self::parse_product(parts.next().unwrap_or_default())?;
        for denominator in parts {
            unit = unit.divide(&Self::parse_product(denominator)?);
        }
        Ok(unit)
    }

    fn parse_product(expr: &str) -> Result<Unit> {
        let mut unit = Unit::dimensionless();
        for term in expr.split('*').map(str::trim) {
            if term.is_empty() {
                return Err(DataError::lookup(format!("malformed unit expression '{}'", expr)));
            }
            if term == "1" {
                continue;
            }
            let (symbol, exp) = match term.split_once('^') {
                Some((symbol, exp)) => {
                    let exp: i32 = exp.trim().parse().map_err(|_| {
                        DataError::lookup(format!("bad exponent in unit term '{}'", term))
                    })?;
                    (symbol.trim(), exp)
                }
                None => (term, 1),
            };
            unit = unit.multiply(&Unit::symbol(symbol)?.power(exp));
        }
        Ok(unit)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let part = |terms: Vec<(&String, i32)>| -> String {
            terms
                .into_iter()
                .map(|(s, p)| if p == 1 { s.clone() } else { format!("{}^{}", s, p) })
                .collect::<Vec<_>>()
                .join("*")
        };
        let pos: Vec<_> = self
            .factors
            .iter()
            .filter(|(_, p)| **p > 0)
            .map(|(s, p)| (s, *p))
            .collect();
        let neg: Vec<_> = self
            .factors
            .iter()
            .filter(|(_, p)| **p < 0)
            .map(|(s, p)| (s, -*p))
            .collect();

        match (pos.is_empty(), neg.is_empty()) {
            (true, true) => write!(f, "1"),
            (false, true) => write!(f, "{}", part(pos)),
            (true, false) => write!(f, "1/{}", part(neg).replace('*', "/")),
            (false, false) => write!(f, "{}/{}", part(pos), part(neg).replace('*', "/")),
        }
    }
}

impl FromStr for Unit {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        Unit::parse(s)
    }
}

impl TryFrom<String> for Unit {
    type Error = DataError;

    fn try_from(value: String) -> Result<Self> {
        Unit::parse(&value)
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.to_string()
    }
}

impl std::ops::Mul for &Unit {
    type Output = Unit;

    fn mul(self, rhs: &Unit) -> Unit {
        self.multiply(rhs)
    }
}

impl std::ops::Div for &Unit {
    type Output = Unit;

    fn div(self, rhs: &Unit) -> Unit {
        self.divide(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::registry::{amino_acid, count, femtogram, gram, mole, second};

    #[test]
    fn test_divide_and_display() {
        let mw = &gram() / &mole();
        assert_eq!(mw.to_string(), "g/mol");
        assert_eq!((&Unit::dimensionless() / &second()).to_string(), "1/s");
        assert_eq!((&amino_acid() / &second()).to_string(), "aa/s");
    }

    #[test]
    fn test_parse_matches_display() {
        for expr in ["g/mol", "1/s", "aa/s", "fg", "mol^2/g/s"] {
            let unit = Unit::parse(expr).unwrap();
            assert_eq!(Unit::parse(&unit.to_string()).unwrap(), unit);
        }
        assert!(Unit::parse("furlong").is_err());
        assert!(Unit::parse("g^x").is_err());
    }

    #[test]
    fn test_named_counts_are_compatible_but_distinct() {
        assert!(amino_acid().is_compatible(&count()));
        assert!(amino_acid().is_compatible(&mole()));
        assert_ne!(amino_acid(), count());
        assert_eq!(amino_acid().conversion_factor(&count()), Some(1.0));
    }

    #[test]
    fn test_mass_conversion() {
        let factor = gram().conversion_factor(&femtogram()).unwrap();
        assert!((factor - 1e15).abs() / 1e15 < 1e-12);
        assert!(gram().conversion_factor(&second()).is_none());
        assert!(gram().convert(1.0, &mole()).is_err());
    }

    #[test]
    fn test_only_registered_symbols() {
        assert_eq!(Unit::symbol("aa").unwrap(), amino_acid());
        assert!(matches!(Unit::symbol("widget"), Err(DataError::Lookup(_))));
        assert!(Unit::symbol("g/mol").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let unit = &gram() / &mole();
        let json = serde_json::to_string(&unit).unwrap();
        assert_eq!(json, "\"g/mol\"");
        let back: Unit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, unit);
    }
}
