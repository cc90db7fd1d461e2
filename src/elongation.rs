//! Elongation rates — per-entity ribosome elongation rates for one time step
//!
//! With variable elongation off every entity runs at the base rate and the
//! override entities (e.g. ribosomal proteins) at the ceiling rate. With it on,
//! every rate comes from an injectable `RatePolicy`.

use crate::error::{DataError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// What a policy knows about the entity it is drawing a rate for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateContext {
    /// Base elongation rate (aa/s)
    pub base: f64,
    /// Rate for override entities (aa/s)
    pub ceiling: f64,
    /// Whether this entity is in the override list
    pub is_override: bool,
    /// Length of the time step (s)
    pub time_step: f64,
}

impl RateContext {
    /// The deterministic rate: ceiling for overrides, base otherwise
    pub fn nominal(&self) -> f64 {
        if self.is_override {
            self.ceiling
        } else {
            self.base
        }
    }
}

/// Strategy for drawing elongation rates under variable elongation
pub trait RatePolicy {
    fn rate<R: Rng + ?Sized>(&self, rng: &mut R, ctx: &RateContext) -> i64;
}

/// No randomness: the nominal rate
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FixedRates;

impl RatePolicy for FixedRates {
    fn rate<R: Rng + ?Sized>(&self, _rng: &mut R, ctx: &RateContext) -> i64 {
        ctx.nominal() as i64
    }
}

/// Uniform multiplicative noise around the nominal rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "JitterSpec")]
pub struct UniformJitter {
    /// Relative half-width of the noise, in [0, 1)
    spread: f64,
}

#[derive(Deserialize)]
struct JitterSpec {
    spread: f64,
}

impl UniformJitter {
    pub fn new(spread: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&spread) {
            return Err(DataError::shape(format!("jitter spread {} outside [0, 1)", spread)));
        }
        Ok(Self { spread })
    }

    pub fn spread(&self) -> f64 {
        self.spread
    }
}

impl TryFrom<JitterSpec> for UniformJitter {
    type Error = DataError;

    fn try_from(spec: JitterSpec) -> Result<Self> {
        UniformJitter::new(spec.spread)
    }
}

impl RatePolicy for UniformJitter {
    fn rate<R: Rng + ?Sized>(&self, rng: &mut R, ctx: &RateContext) -> i64 {
        let factor = rng.gen_range((1.0 - self.spread)..=(1.0 + self.spread));
        (ctx.nominal() * factor).round().max(0.0) as i64
    }
}

/// One elongation rate per entity for the coming step
#[allow(clippy::too_many_arguments)]
pub fn make_elongation_rates<R: Rng + ?Sized, P: RatePolicy>(
    rng: &mut R,
    n_entities: usize,
    base: f64,
    overrides: &[usize],
    ceiling: f64,
    time_step: f64,
    variable_elongation: bool,
    policy: &P,
) -> Result<Vec<i64>> {
    if let Some(&bad) = overrides.iter().find(|&&i| i >= n_entities) {
        return Err(DataError::shape(format!(
            "override index {} out of bounds for {} entities",
            bad, n_entities
        )));
    }

    let mut is_override = vec![false; n_entities];
    for &i in overrides {
        is_override[i] = true;
    }

    let rates = is_override
        .into_iter()
        .map(|is_override| {
            let ctx = RateContext {
                base,
                ceiling,
                is_override,
                time_step,
            };
            if variable_elongation {
                policy.rate(&mut *rng, &ctx)
            } else {
                ctx.nominal() as i64
            }
        })
        .collect();
    Ok(rates)
}
