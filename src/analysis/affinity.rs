//! Binding free energy to dissociation constant.
//!
//! The conversion is `Kd = exp(-ΔG / (R·T))`. Input energies are always
//! kcal/mol, as docking engines report them; [`EnergyUnit`] selects whether
//! the exponent is evaluated in kcal or in Joules. Both conventions agree up
//! to the precision of the constants.

use super::error::Error;
use serde::{Deserialize, Serialize};

/// Gas constant in kcal/(mol·K).
pub const GAS_CONSTANT_KCAL: f64 = 1.987_204e-3;
/// Gas constant in J/(mol·K).
pub const GAS_CONSTANT_J: f64 = 8.314_462_618;
/// Thermochemical calorie conversion.
pub const JOULES_PER_KCAL: f64 = 4184.0;
/// Standard temperature used when none is configured (K).
pub const DEFAULT_TEMPERATURE: f64 = 298.0;

/// Unit in which the exponent `ΔG / RT` is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnergyUnit {
    #[default]
    KcalPerMol,
    JoulePerMol,
}

impl EnergyUnit {
    fn gas_constant(self) -> f64 {
        match self {
            EnergyUnit::KcalPerMol => GAS_CONSTANT_KCAL,
            EnergyUnit::JoulePerMol => GAS_CONSTANT_J,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffinityParams {
    /// Temperature in Kelvin.
    pub temperature: f64,
    pub unit: EnergyUnit,
}

impl Default for AffinityParams {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            unit: EnergyUnit::KcalPerMol,
        }
    }
}

/// Converts binding free energies to dissociation constants.
#[derive(Debug, Clone, Copy)]
pub struct AffinityConverter {
    rt: f64,
    unit: EnergyUnit,
}

impl Default for AffinityConverter {
    fn default() -> Self {
        Self {
            rt: GAS_CONSTANT_KCAL * DEFAULT_TEMPERATURE,
            unit: EnergyUnit::KcalPerMol,
        }
    }
}

impl AffinityConverter {
    pub fn new(params: AffinityParams) -> Result<Self, Error> {
        if !(params.temperature.is_finite() && params.temperature > 0.0) {
            return Err(Error::InvalidTemperature(params.temperature));
        }
        Ok(Self {
            rt: params.unit.gas_constant() * params.temperature,
            unit: params.unit,
        })
    }

    pub fn unit(&self) -> EnergyUnit {
        self.unit
    }

    /// `exp(-ΔG / RT)` for `delta_g` in kcal/mol.
    ///
    /// Never panics: very favourable energies saturate to `+∞`, very
    /// unfavourable ones to `0.0`.
    #[inline]
    pub fn kd(&self, delta_g: f64) -> f64 {
        let delta_g = match self.unit {
            EnergyUnit::KcalPerMol => delta_g,
            EnergyUnit::JoulePerMol => kcal_to_joule(delta_g),
        };
        (-delta_g / self.rt).exp()
    }

    /// Mean Kd over a set of pose energies (kcal/mol); `None` for an empty
    /// slice.
    pub fn mean_kd(&self, delta_gs: &[f64]) -> Option<f64> {
        mean(delta_gs.iter().map(|&g| self.kd(g)))
    }
}

/// Converts ΔG given in kcal/mol to J/mol.
#[inline]
pub fn kcal_to_joule(kcal: f64) -> f64 {
    kcal * JOULES_PER_KCAL
}

/// Arithmetic mean; `None` for an empty iterator.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
