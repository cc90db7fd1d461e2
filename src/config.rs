//! Configuration for building translation parameters
//!
//! Values are simulation constants; defaults match the reference E. coli
//! parameter set. Persisted as JSON alongside other parameter files.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Constants consumed by the translation parameter builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Longest simulation time step (s); sizes the elongation margin of the sequence buffer
    pub max_timestep: f64,
    /// Basal ribosome elongation rate (aa/s)
    pub ribosome_elongation_rate_basal: f64,
    /// Maximum ribosome elongation rate (aa/s)
    pub ribosome_elongation_rate_max: f64,
    /// Extra slots after the elongation margin so the next amino acid can always be read
    pub next_aa_pad: usize,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            max_timestep: 2.0,
            ribosome_elongation_rate_basal: 12.0,
            ribosome_elongation_rate_max: 22.0,
            next_aa_pad: 1,
        }
    }
}

impl TranslationConfig {
    /// Slots reserved for elongation beyond the longest sequence within one step
    pub fn elongation_margin(&self) -> usize {
        (self.max_timestep * self.ribosome_elongation_rate_max).floor().max(0.0) as usize
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
