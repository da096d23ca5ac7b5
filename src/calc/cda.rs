use serde::Serialize;

use crate::error::CalcError;

use super::PSI_TO_PA;

// ---------------------------------------------------------------------------
// CdA = ṁ / √(2ρΔP)
// ---------------------------------------------------------------------------

/// Quick-select densities for the set-pressure panel, kg/m³.
pub const DENSITY_PRESETS: &[(&str, f64)] = &[("Water", 1000.0), ("LOX", 1141.0), ("RP-1", 820.0)];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CdaInputs {
    /// kg/s
    pub mdot: f64,
    /// psi
    pub p_high: f64,
    /// psi
    pub p_low: f64,
    /// kg/m³
    pub rho: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CdaResult {
    pub inputs: CdaInputs,
    /// Pa
    pub delta_p: f64,
    /// m²
    pub cda: f64,
}

impl CdaResult {
    pub fn cda_mm2(&self) -> f64 {
        self.cda * 1e6
    }
}

pub fn compute_cda(inputs: CdaInputs) -> Result<CdaResult, CalcError> {
    let delta_p = (inputs.p_high - inputs.p_low) * PSI_TO_PA;
    if delta_p <= 0.0 {
        return Err(CalcError::OutOfRange("P_high must be greater than P_low."));
    }
    if inputs.rho <= 0.0 {
        return Err(CalcError::OutOfRange("Density must be positive."));
    }
    let cda = inputs.mdot / (2.0 * inputs.rho * delta_p).sqrt();
    Ok(CdaResult {
        inputs,
        delta_p,
        cda,
    })
}

// ---------------------------------------------------------------------------
// Required set pressure: P_set = (ṁ/CdA)²/(2ρ) + P_manifold
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SetPressureInputs {
    /// m²
    pub cda: f64,
    /// target flow, kg/s
    pub mdot: f64,
    /// kg/m³
    pub rho: f64,
    /// downstream (manifold) pressure, psi
    pub manifold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SetPressureResult {
    pub inputs: SetPressureInputs,
    /// pressure drop across the orifice, Pa
    pub delta_p: f64,
    /// Pa
    pub p_set_pa: f64,
}

impl SetPressureResult {
    pub fn p_set_psi(&self) -> f64 {
        self.p_set_pa / PSI_TO_PA
    }
}

pub fn required_set_pressure(inputs: SetPressureInputs) -> Result<SetPressureResult, CalcError> {
    if inputs.cda <= 0.0 {
        return Err(CalcError::OutOfRange("CdA must be positive."));
    }
    if inputs.rho <= 0.0 {
        return Err(CalcError::OutOfRange("Density must be positive."));
    }
    let delta_p = (inputs.mdot / inputs.cda).powi(2) / (2.0 * inputs.rho);
    let p_set_pa = delta_p + inputs.manifold * PSI_TO_PA;
    Ok(SetPressureResult {
        inputs,
        delta_p,
        p_set_pa,
    })
}
