//! TranslationData — monomer table, translation sequences and elongation defaults

use super::inputs::TranslationInputs;
use crate::config::TranslationConfig;
use crate::elongation::{make_elongation_rates, RatePolicy};
use crate::error::{DataError, Result};
use crate::sequences::{BufferWidth, SequenceStore};
use crate::table::{ColumnData, UnitTable, UnitTag};
use crate::units::registry::{amino_acid, femtogram, gram, gram_per_mole, per_second, N_AVOGADRO};
use log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Translation parameters for the simulation
///
/// Serializes with `translation_sequences` compacted; deserializing rebuilds
/// the padded buffer before anything can read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationData {
    /// Columns: id, cistron_id, deg_rate (1/s), length (aa), aa_counts (aa), mw (g/mol)
    pub monomer_data: UnitTable,
    /// Amino-acid index sequences, one row per monomer
    pub translation_sequences: SequenceStore,
    pub translation_efficiencies_by_monomer: Vec<f64>,
    /// Mass added per incorporated amino acid (fg), alphabet order
    pub translation_monomer_weights: Vec<f64>,
    /// Mass of the water released at chain end (fg)
    pub translation_end_weight: f64,
    /// Ribosome footprint on mRNA (nt)
    pub active_ribosome_footprint_size: i64,
    /// Sorted row indexes of ribosomal proteins in `monomer_data`
    pub ribosomal_protein_indexes: Vec<usize>,
    pub basal_elongation_rate: f64,
    pub max_elongation_rate: f64,
    /// Default per-monomer rates: basal, max for ribosomal proteins
    pub elongation_rates: Vec<i64>,
    pub next_aa_pad: usize,
}

impl TranslationData {
    pub fn build(inputs: &TranslationInputs, config: &TranslationConfig) -> Result<Self> {
        if inputs.monomers.is_empty() {
            return Err(DataError::shape("no monomers to build translation data from"));
        }

        let monomer_data = build_monomer_data(inputs)?;
        let translation_sequences = build_sequences(inputs, &monomer_data, config)?;
        let (translation_monomer_weights, translation_end_weight) = build_weights(inputs)?;
        let active_ribosome_footprint_size = *inputs
            .footprint_sizes
            .get("active_ribosome")
            .ok_or_else(|| DataError::lookup("RNA footprint size for ribosomes not found"))?;
        let translation_efficiencies_by_monomer = build_efficiencies(inputs)?;

        let index_of: HashMap<String, usize> = inputs
            .monomers
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id_with_compartment(), i))
            .collect();
        let mut ribosomal_protein_indexes: Vec<usize> = inputs
            .ribosomal_protein_ids
            .iter()
            .filter_map(|id| index_of.get(id).copied())
            .collect();
        ribosomal_protein_indexes.sort_unstable();
        ribosomal_protein_indexes.dedup();

        let basal_elongation_rate = config.ribosome_elongation_rate_basal;
        let max_elongation_rate = config.ribosome_elongation_rate_max;
        let mut elongation_rates = vec![basal_elongation_rate as i64; inputs.monomers.len()];
        for &i in &ribosomal_protein_indexes {
            elongation_rates[i] = max_elongation_rate as i64;
        }

        info!(
            "Built translation data: {} monomers, {} ribosomal proteins, sequence buffer {:?}",
            monomer_data.len(),
            ribosomal_protein_indexes.len(),
            translation_sequences.shape()
        );

        Ok(Self {
            monomer_data,
            translation_sequences,
            translation_efficiencies_by_monomer,
            translation_monomer_weights,
            translation_end_weight,
            active_ribosome_footprint_size,
            ribosomal_protein_indexes,
            basal_elongation_rate,
            max_elongation_rate,
            elongation_rates,
            next_aa_pad: config.next_aa_pad,
        })
    }

    pub fn n_monomers(&self) -> usize {
        self.monomer_data.len()
    }

    /// Per-monomer elongation rates for one step; ribosomal proteins use the max rate
    pub fn make_elongation_rates<R: Rng + ?Sized, P: RatePolicy>(
        &self,
        rng: &mut R,
        base: f64,
        time_step: f64,
        variable_elongation: bool,
        policy: &P,
    ) -> Result<Vec<i64>> {
        make_elongation_rates(
            rng,
            self.n_monomers(),
            base,
            &self.ribosomal_protein_indexes,
            self.max_elongation_rate,
            time_step,
            variable_elongation,
            policy,
        )
    }
}

fn build_monomer_data(inputs: &TranslationInputs) -> Result<UnitTable> {
    let monomers = &inputs.monomers;
    let mut deg_rates = Vec::with_capacity(monomers.len());
    let mut lengths = Vec::with_capacity(monomers.len());
    let mut aa_counts = Vec::with_capacity(monomers.len());
    let mut mws = Vec::with_capacity(monomers.len());
    for m in monomers {
        deg_rates.push(inputs.half_lives.degradation_rate(m)?);
        lengths.push(m.sequence.chars().count() as i64);
        aa_counts.push(inputs.alphabet.counts(&m.sequence)?);
        mws.push(m.mw.scalar_in(&gram_per_mole())?);
    }

    let columns = vec![
        ("id".to_string(), ColumnData::text(monomers.iter().map(|m| m.id_with_compartment()))),
        (
            "cistron_id".to_string(),
            ColumnData::text(monomers.iter().map(|m| m.cistron_id.as_str())),
        ),
        ("deg_rate".to_string(), ColumnData::Float(deg_rates)),
        ("length".to_string(), ColumnData::Int(lengths)),
        ("aa_counts".to_string(), ColumnData::int_rows(&aa_counts, inputs.alphabet.len())?),
        ("mw".to_string(), ColumnData::Float(mws)),
    ];
    let units = HashMap::from([
        ("id".to_string(), UnitTag::Unitless),
        ("cistron_id".to_string(), UnitTag::Unitless),
        ("deg_rate".to_string(), UnitTag::Unit(per_second())),
        ("length".to_string(), UnitTag::Unit(amino_acid())),
        ("aa_counts".to_string(), UnitTag::Unit(amino_acid())),
        ("mw".to_string(), UnitTag::Unit(gram_per_mole())),
    ]);
    UnitTable::new(columns, units)
}

fn build_sequences(
    inputs: &TranslationInputs,
    monomer_data: &UnitTable,
    config: &TranslationConfig,
) -> Result<SequenceStore> {
    let max_length = monomer_data
        .quantity("length")?
        .values_in(&amino_acid())?
        .into_iter()
        .fold(0.0, f64::max) as usize;
    let width = BufferWidth::new(max_length, config.elongation_margin(), config.next_aa_pad);
    let sequences: Vec<&str> = inputs.monomers.iter().map(|m| m.sequence.as_str()).collect();
    SequenceStore::encode(&sequences, &inputs.alphabet, width)
}

/// Per-residue polymerized masses and the chain-end water mass, in fg
fn build_weights(inputs: &TranslationInputs) -> Result<(Vec<f64>, f64)> {
    let g_to_fg = gram()
        .conversion_factor(&femtogram())
        .ok_or_else(|| DataError::unit_mismatch("g is not convertible to fg"))?;
    let per_molecule = |mw: f64| mw / N_AVOGADRO * g_to_fg;

    let water = inputs.water_mw.scalar_in(&gram_per_mole())?;
    let aa_mws = inputs.amino_acid_mws.values_in(&gram_per_mole())?;
    if aa_mws.len() != inputs.alphabet.len() {
        return Err(DataError::shape(format!(
            "{} amino-acid weights for an alphabet of {}",
            aa_mws.len(),
            inputs.alphabet.len()
        )));
    }
    let weights = aa_mws.into_iter().map(|mw| per_molecule(mw - water)).collect();
    Ok((weights, per_molecule(water)))
}

/// Efficiencies by monomer; missing values take the mean of the known ones
fn build_efficiencies(inputs: &TranslationInputs) -> Result<Vec<f64>> {
    let known: Vec<Option<f64>> = inputs
        .monomers
        .iter()
        .map(|m| {
            inputs
                .translation_efficiency
                .get(&m.gene_id)
                .copied()
                .filter(|x| x.is_finite())
        })
        .collect();
    let present: Vec<f64> = known.iter().flatten().copied().collect();
    if present.is_empty() {
        return Err(DataError::lookup("no translation efficiency known for any monomer"));
    }
    let mean = present.iter().sum::<f64>() / present.len() as f64;
    let missing = known.len() - present.len();
    if missing > 0 {
        warn!(
            "{} of {} monomers lack a translation efficiency; using the mean {:.4}",
            missing,
            known.len(),
            mean
        );
    }
    Ok(known.into_iter().map(|x| x.unwrap_or(mean)).collect())
}
