//! Structural quantity calculators
//!
//! Closed-form formulas for concrete volumes and reinforcement schedules of
//! building elements. Lengths are in metres, bar diameters in millimetres,
//! volumes in m³ and steel weights in kg unless a field name says otherwise.
//!
//! Inputs and results are serialized with snake_case names that carry the
//! unit (`length_m`, `total_weight_kg`); only the report envelope around them
//! is camelCase.

pub mod beams;
pub mod columns;
pub mod concrete;
pub mod request;
pub mod ribs;
pub mod slabs;
pub mod steel;

pub use request::{CalculationOutcome, CalculationRequest, CalculationType};

use thiserror::Error;

/// Errors raised while validating calculator inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("{field} must be greater than 0")]
    NotPositive { field: &'static str },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },

    #[error("{field} is out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },

    #[error("unsupported bar diameter {0} mm")]
    UnsupportedDiameter(u32),

    #[error("{0}")]
    MissingInput(String),

    #[error("unknown calculation type '{0}'")]
    UnknownCalculationType(String),
}

pub type CalcResult<T> = Result<T, CalcError>;

/// Require a finite, strictly positive value.
pub(crate) fn positive(field: &'static str, value: f64) -> CalcResult<f64> {
    if !value.is_finite() {
        return Err(CalcError::NotFinite { field });
    }
    if value <= 0.0 {
        return Err(CalcError::NotPositive { field });
    }
    Ok(value)
}

/// Like [`positive`] but zero is allowed (used for optional layers).
pub(crate) fn non_negative(field: &'static str, value: f64) -> CalcResult<f64> {
    if !value.is_finite() {
        return Err(CalcError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(CalcError::OutOfRange {
            field,
            reason: "must not be negative".to_string(),
        });
    }
    Ok(value)
}

/// Largest element or bar count accepted from a caller.
pub const MAX_COUNT: u32 = 100_000;

pub(crate) fn count(field: &'static str, value: u32) -> CalcResult<u32> {
    if value == 0 {
        return Err(CalcError::ZeroCount { field });
    }
    if value > MAX_COUNT {
        return Err(CalcError::OutOfRange {
            field,
            reason: format!("must be at most {MAX_COUNT}"),
        });
    }
    Ok(value)
}

fn too_many_pieces(field: &'static str) -> CalcError {
    CalcError::OutOfRange {
        field,
        reason: "produces more pieces than a schedule can hold".to_string(),
    }
}

/// Convert a computed piece count, rejecting values that do not fit a `u32`.
pub(crate) fn to_count(field: &'static str, value: f64) -> CalcResult<u32> {
    if !value.is_finite() || value < 0.0 || value > f64::from(u32::MAX) {
        return Err(too_many_pieces(field));
    }
    Ok(value as u32)
}

pub(crate) fn mul_count(field: &'static str, a: u32, b: u32) -> CalcResult<u32> {
    a.checked_mul(b).ok_or_else(|| too_many_pieces(field))
}

/// Reject results that overflowed to infinity or NaN.
pub(crate) fn finite_result(field: &'static str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::OutOfRange {
            field,
            reason: "result is too large to compute".to_string(),
        })
    }
}

pub(crate) fn within(field: &'static str, value: f64, min: f64, max: f64) -> CalcResult<f64> {
    if !value.is_finite() {
        return Err(CalcError::NotFinite { field });
    }
    if value < min || value > max {
        return Err(CalcError::OutOfRange {
            field,
            reason: format!("expected {min}..={max}, got {value}"),
        });
    }
    Ok(value)
}

/// Round to 3 decimals (volumes, lengths).
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Round to 2 decimals (weights, areas).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round up to the next multiple of `step`.
pub(crate) fn ceil_to(value: f64, step: f64) -> f64 {
    // Guard against 35.000000001 style noise pushing a value up a whole step.
    let scaled = value / step;
    (scaled - 1e-9).ceil() * step
}

/// Apply a waste allowance in percent (0..=25) to a volume.
pub(crate) fn with_waste(volume: f64, waste_percent: Option<f64>) -> CalcResult<f64> {
    match waste_percent {
        None => Ok(volume),
        Some(pct) => {
            let pct = within("waste_percent", pct, 0.0, 25.0)?;
            Ok(volume * (1.0 + pct / 100.0))
        }
    }
}
