use serde::Serialize;

use crate::error::CalcError;

use super::{IN2_TO_M2, PSI_TO_PA};

// ---------------------------------------------------------------------------
// Venturi mass flow: ṁ = Cd·Y·A₂·√(2ρΔP / (1 − (A₂/A₁)²))
// ---------------------------------------------------------------------------

/// Quick-select densities, kg/m³.
pub const FLUID_PRESETS: &[(&str, f64)] = &[
    ("Water", 1000.0),
    ("LOX", 1141.0),
    ("N2O", 1220.0),
    ("Ethanol", 789.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VenturiParams {
    /// upstream area, in²
    pub a1: f64,
    /// throat area, in²
    pub a2: f64,
    pub cd: f64,
    /// expansion factor, 1 for liquids
    pub y: f64,
    /// kg/m³
    pub rho: f64,
}

impl VenturiParams {
    pub fn validate(&self) -> Result<(), CalcError> {
        if self.a1 <= 0.0 || self.a2 <= 0.0 {
            return Err(CalcError::OutOfRange("Areas must be positive values."));
        }
        if self.a2 >= self.a1 {
            return Err(CalcError::OutOfRange(
                "A₂ (throat) must be smaller than A₁ (upstream).",
            ));
        }
        if self.cd <= 0.0 || self.cd > 1.0 {
            return Err(CalcError::OutOfRange(
                "Discharge coefficient must be between 0 and 1.",
            ));
        }
        if self.rho <= 0.0 {
            return Err(CalcError::OutOfRange("Density must be positive."));
        }
        Ok(())
    }

    fn throat_m2(&self) -> f64 {
        self.a2 * IN2_TO_M2
    }

    /// 1 − (A₂/A₁)²; the in²→m² factor cancels in the ratio.
    fn velocity_of_approach(&self) -> f64 {
        1.0 - (self.a2 / self.a1).powi(2)
    }

    /// Flow for one pressure pair (psi). Reversed ΔP is clamped to zero.
    fn flow_unchecked(&self, p1: f64, p2: f64) -> f64 {
        let delta_p = ((p1 - p2) * PSI_TO_PA).max(0.0);
        self.cd
            * self.y
            * self.throat_m2()
            * (2.0 * self.rho * delta_p / self.velocity_of_approach()).sqrt()
    }
}

/// Mass flow (kg/s) for a single upstream/throat reading in psi.
pub fn mass_flow(p1: f64, p2: f64, params: &VenturiParams) -> Result<f64, CalcError> {
    params.validate()?;
    Ok(params.flow_unchecked(p1, p2))
}

/// Mass flow for every row. Rows with a missing pressure give 0.
pub fn mass_flow_series(
    p1: &[f64],
    p2: &[f64],
    params: &VenturiParams,
) -> Result<Vec<f64>, CalcError> {
    p1.iter()
        .zip(p2)
        .map(|(&a, &b)| {
            let m = mass_flow(a, b, params)?;
            Ok(if m.is_nan() { 0.0 } else { m })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlowSummary {
    /// mean over samples with positive flow
    pub mean_flowing: f64,
    pub max: f64,
}

pub fn summarize(mdot: &[f64]) -> Option<FlowSummary> {
    let flowing: Vec<f64> = mdot.iter().copied().filter(|&m| m > 0.0).collect();
    if flowing.is_empty() {
        return None;
    }
    let mean_flowing = flowing.iter().sum::<f64>() / flowing.len() as f64;
    let max = flowing.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(FlowSummary { mean_flowing, max })
}

/// Centred moving average with a box kernel of length `window`.
///
/// Samples beyond either end count as zero, so the output has the same
/// length as the input and the edges droop. `window <= 1` is a no-op.
pub fn smooth(values: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 {
        return values.to_vec();
    }
    let n = values.len() as isize;
    let w = window as isize;
    let lead = (w - 1) / 2;
    (0..n)
        .map(|i| {
            let hi = i + lead;
            let lo = hi - (w - 1);
            let sum: f64 = (lo.max(0)..=hi.min(n - 1))
                .map(|j| values[j as usize])
                .sum();
            sum / window as f64
        })
        .collect()
}
