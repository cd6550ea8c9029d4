//! Reinforcement bar catalogue and counting rules.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::{mul_count, positive, round2, round3, to_count, CalcError, CalcResult};

/// Standard rebar diameters in millimetres.
pub const STANDARD_DIAMETERS_MM: [u32; 12] = [6, 8, 10, 12, 14, 16, 18, 20, 22, 25, 28, 32];

/// Anchorage length expressed in bar diameters.
pub const ANCHORAGE_DIAMETERS: f64 = 40.0;

/// Hook allowance per end for stirrups/ties, in bar diameters.
pub const HOOK_DIAMETERS: f64 = 10.0;

/// A catalogue entry describing one bar size.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BarSpec {
    pub diameter_mm: u32,
    pub area_mm2: f64,
    pub unit_weight_kg_per_m: f64,
}

pub fn catalogue() -> Vec<BarSpec> {
    STANDARD_DIAMETERS_MM
        .iter()
        .map(|&d| BarSpec {
            diameter_mm: d,
            area_mm2: round2(bar_area_mm2(d)),
            unit_weight_kg_per_m: round3(unit_weight_kg_per_m(d)),
        })
        .collect()
}

pub fn validate_diameter(diameter_mm: u32) -> CalcResult<u32> {
    if STANDARD_DIAMETERS_MM.contains(&diameter_mm) {
        Ok(diameter_mm)
    } else {
        Err(CalcError::UnsupportedDiameter(diameter_mm))
    }
}

pub fn bar_area_mm2(diameter_mm: u32) -> f64 {
    let d = f64::from(diameter_mm);
    PI * d * d / 4.0
}

/// Mass per metre of a round bar, `d² / 162`.
pub fn unit_weight_kg_per_m(diameter_mm: u32) -> f64 {
    let d = f64::from(diameter_mm);
    d * d / 162.0
}

/// Number of bars needed to provide `required_mm2` of steel, never fewer than `min_count`.
///
/// `field` names the input blamed when the count does not fit a schedule.
pub fn bars_for_area(
    field: &'static str,
    required_mm2: f64,
    diameter_mm: u32,
    min_count: u32,
) -> CalcResult<u32> {
    let needed = (required_mm2 / bar_area_mm2(diameter_mm)).ceil();
    let needed = if needed > 0.0 { to_count(field, needed)? } else { 0 };
    Ok(needed.max(min_count))
}

/// Bars laid across `span_m` at `spacing_m` centres, including both edge bars.
pub fn bars_for_spacing(span_m: f64, spacing_m: f64) -> CalcResult<u32> {
    let span = positive("span_m", span_m)?;
    let spacing = positive("spacing_m", spacing_m)?;
    to_count("span_m", (span / spacing - 1e-9).ceil() + 1.0)
}

/// Straight bar length with anchorage at both ends.
pub fn anchored_length_m(clear_length_m: f64, diameter_mm: u32) -> f64 {
    clear_length_m + 2.0 * ANCHORAGE_DIAMETERS * f64::from(diameter_mm) / 1000.0
}

/// One line of a bar bending schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SteelLine {
    pub label: String,
    pub diameter_mm: u32,
    pub count: u32,
    pub bar_length_m: f64,
    pub total_length_m: f64,
    pub weight_kg: f64,
}

impl SteelLine {
    pub fn new(label: impl Into<String>, diameter_mm: u32, count: u32, bar_length_m: f64) -> Self {
        let total = f64::from(count) * bar_length_m;
        Self {
            label: label.into(),
            diameter_mm,
            count,
            bar_length_m: round3(bar_length_m),
            total_length_m: round3(total),
            weight_kg: round2(total * unit_weight_kg_per_m(diameter_mm)),
        }
    }

    /// Repeat this line for `times` identical elements.
    pub fn times(self, times: u32) -> CalcResult<Self> {
        let count = mul_count("count", self.count, times)?;
        Ok(Self::new(self.label, self.diameter_mm, count, self.bar_length_m))
    }
}

/// Collected reinforcement for one calculation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SteelSchedule {
    pub lines: Vec<SteelLine>,
    pub total_weight_kg: f64,
}

impl SteelSchedule {
    pub fn from_lines(lines: Vec<SteelLine>) -> Self {
        let total: f64 = lines.iter().map(|l| l.weight_kg).sum();
        Self {
            lines,
            total_weight_kg: round2(total),
        }
    }
}
