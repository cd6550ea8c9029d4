//! Beam concrete and reinforcement quantities.

use serde::{Deserialize, Serialize};

use super::concrete::ConcreteQuantity;
use super::steel::{self, SteelLine, SteelSchedule};
use super::{count, positive, round3, within, CalcError, CalcResult};

fn one() -> u32 {
    1
}
fn default_cover() -> f64 {
    0.025
}
fn default_bottom_bar() -> u32 {
    16
}
fn default_top_bar() -> u32 {
    12
}
fn default_stirrup_bar() -> u32 {
    8
}
fn default_stirrup_spacing() -> f64 {
    0.15
}
fn default_steel_ratio() -> f64 {
    0.005
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeamInput {
    pub span_m: f64,
    pub width_m: f64,
    pub depth_m: f64,
    #[serde(default = "one")]
    pub count: u32,
    #[serde(default = "default_cover")]
    pub cover_m: f64,
    #[serde(default = "default_bottom_bar")]
    pub bottom_bar_diameter_mm: u32,
    #[serde(default = "default_top_bar")]
    pub top_bar_diameter_mm: u32,
    #[serde(default = "default_stirrup_bar")]
    pub stirrup_diameter_mm: u32,
    #[serde(default = "default_stirrup_spacing")]
    pub stirrup_spacing_m: f64,
    #[serde(default = "default_steel_ratio")]
    pub steel_ratio: f64,
    #[serde(default)]
    pub waste_percent: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BeamResult {
    pub concrete: ConcreteQuantity,
    pub effective_depth_m: f64,
    pub bottom_bars: u32,
    pub top_bars: u32,
    pub stirrups_per_beam: u32,
    pub steel: SteelSchedule,
}

pub fn beam_quantities(input: &BeamInput) -> CalcResult<BeamResult> {
    let span = positive("span_m", input.span_m)?;
    let b = positive("width_m", input.width_m)?;
    let h = positive("depth_m", input.depth_m)?;
    let n = count("count", input.count)?;
    let cover = positive("cover_m", input.cover_m)?;
    let spacing = positive("stirrup_spacing_m", input.stirrup_spacing_m)?;
    let ratio = within("steel_ratio", input.steel_ratio, 0.0015, 0.04)?;
    let bottom_d = steel::validate_diameter(input.bottom_bar_diameter_mm)?;
    let top_d = steel::validate_diameter(input.top_bar_diameter_mm)?;
    let stirrup_d = steel::validate_diameter(input.stirrup_diameter_mm)?;

    let inner_b = b - 2.0 * cover;
    let inner_h = h - 2.0 * cover;
    if inner_b <= 0.0 || inner_h <= 0.0 {
        return Err(CalcError::OutOfRange {
            field: "cover_m",
            reason: "cover leaves no room for reinforcement".to_string(),
        });
    }

    let effective_depth =
        h - cover - f64::from(stirrup_d) / 1000.0 - f64::from(bottom_d) / 2000.0;
    if effective_depth <= 0.0 {
        return Err(CalcError::OutOfRange {
            field: "depth_m",
            reason: "too shallow for the cover, stirrups and bottom bars".to_string(),
        });
    }
    // steel areas in mm²
    let bd_mm2 = b * 1000.0 * effective_depth * 1000.0;
    let bottom_bars = steel::bars_for_area("width_m", ratio * bd_mm2, bottom_d, 2)?;
    let top_bars = steel::bars_for_area("width_m", 0.2 * ratio * bd_mm2, top_d, 2)?;
    let stirrups = steel::bars_for_spacing(span, spacing)?;

    let stirrup_length =
        2.0 * (inner_b + inner_h) + 2.0 * steel::HOOK_DIAMETERS * f64::from(stirrup_d) / 1000.0;

    let steel = SteelSchedule::from_lines(vec![
        SteelLine::new("bottom bars", bottom_d, bottom_bars, steel::anchored_length_m(span, bottom_d))
            .times(n)?,
        SteelLine::new("top bars", top_d, top_bars, steel::anchored_length_m(span, top_d))
            .times(n)?,
        SteelLine::new("stirrups", stirrup_d, stirrups, stirrup_length).times(n)?,
    ]);

    let concrete = ConcreteQuantity::build(span * b * h, n, 0.0, input.waste_percent)?;

    Ok(BeamResult {
        concrete,
        effective_depth_m: round3(effective_depth),
        bottom_bars,
        top_bars,
        stirrups_per_beam: stirrups,
        steel,
    })
}
