//! Inputs to the translation parameter builder
//!
//! Records arrive already joined (gene ↔ RNA ↔ protein); what remains here are
//! keyed lookups, each of which fails loudly when a reference is missing.

use crate::error::{DataError, Result};
use crate::sequences::Alphabet;
use crate::units::registry::second;
use crate::units::Quantity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One protein monomer with a valid sequence and mRNA cistron
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonomerRecord {
    pub id: String,
    /// Compartment tag, e.g. `c`
    pub compartment: String,
    pub cistron_id: String,
    pub gene_id: String,
    /// One-letter amino-acid sequence
    pub sequence: String,
    /// Molecular weight, any mass-per-amount unit
    pub mw: Quantity,
    /// Whether the initial methionine is cleaved (N-end residue is then the second one)
    pub cleaves_initial_methionine: bool,
}

impl MonomerRecord {
    /// Id with compartment, e.g. `EG10001-MONOMER[c]`
    pub fn id_with_compartment(&self) -> String {
        format!("{}[{}]", self.id, self.compartment)
    }
}

/// Protein half-life references, in priority order measured → pulsed-SILAC → N-end rule
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HalfLives {
    pub measured: HashMap<String, Quantity>,
    pub pulsed_silac: HashMap<String, Quantity>,
    /// Keyed by the N-terminal residue's one-letter code
    pub n_end_rule: HashMap<char, Quantity>,
}

impl HalfLives {
    /// First-order degradation rate (1/s) of a monomer
    pub fn degradation_rate(&self, monomer: &MonomerRecord) -> Result<f64> {
        let half_life = match self
            .measured
            .get(&monomer.id)
            .or_else(|| self.pulsed_silac.get(&monomer.id))
        {
            Some(h) => h,
            None => self.n_end_half_life(monomer)?,
        };
        Ok(std::f64::consts::LN_2 / half_life.scalar_in(&second())?)
    }

    fn n_end_half_life(&self, monomer: &MonomerRecord) -> Result<&Quantity> {
        let mut residues = monomer.sequence.chars();
        if residues.next() != Some('M') {
            return Err(DataError::lookup(format!(
                "sequence of {} does not start with methionine",
                monomer.id
            )));
        }
        let n_end = if monomer.cleaves_initial_methionine {
            residues.next()
        } else {
            Some('M')
        };
        let residue = n_end.ok_or_else(|| {
            DataError::lookup(format!("{} has no residue after the cleaved methionine", monomer.id))
        })?;
        self.n_end_rule.get(&residue).ok_or_else(|| {
            DataError::lookup(format!(
                "no N-end rule half life for residue '{}' ({})",
                residue, monomer.id
            ))
        })
    }
}

/// Everything the builder needs besides the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationInputs {
    pub monomers: Vec<MonomerRecord>,
    pub half_lives: HalfLives,
    /// Translation efficiency by gene id; non-finite entries count as missing
    pub translation_efficiency: HashMap<String, f64>,
    /// Ribosomal protein ids with compartment tags
    pub ribosomal_protein_ids: Vec<String>,
    pub alphabet: Alphabet,
    /// Amino-acid molecular weights in alphabet order
    pub amino_acid_mws: Quantity,
    pub water_mw: Quantity,
    /// Footprint size (nt) by molecule id; must contain `active_ribosome`
    pub footprint_sizes: HashMap<String, i64>,
}
