//! Closed-form flow calculations and the weight-slope rate estimator.
//!
//! All pressures enter in PSI and all areas in in², as read off the test
//! stand; everything is converted to SI before a formula is applied.

pub mod cda;
pub mod rate;
pub mod venturi;

use crate::error::CalcError;

/// 1 psi in pascals.
pub const PSI_TO_PA: f64 = 6894.76;
/// 1 lb in kilograms.
pub const LBS_TO_KG: f64 = 0.453592;
/// 1 in² in m².
pub const IN2_TO_M2: f64 = 0.000_645_16;
/// Sea-level ambient pressure, psi.
pub const AMBIENT_PSI: f64 = 14.7;

/// Parse a numeric text entry. Non-numeric and non-finite text is rejected
/// with an error naming the field.
pub fn parse_field(field: &'static str, text: &str) -> Result<f64, CalcError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CalcError::InvalidNumber {
            field,
            text: text.to_string(),
        })
}
