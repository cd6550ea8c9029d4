//! Solid slab concrete and bar mesh.

use serde::{Deserialize, Serialize};

use super::concrete::ConcreteQuantity;
use super::steel::{self, SteelLine, SteelSchedule};
use super::{positive, CalcError, CalcResult};

fn default_cover() -> f64 {
    0.02
}
fn default_bar() -> u32 {
    10
}
fn default_spacing() -> f64 {
    0.15
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlabInput {
    pub length_m: f64,
    pub width_m: f64,
    pub thickness_m: f64,
    #[serde(default = "default_cover")]
    pub cover_m: f64,
    #[serde(default = "default_bar")]
    pub bar_diameter_mm: u32,
    #[serde(default = "default_spacing")]
    pub spacing_m: f64,
    /// Adds an identical top mesh.
    #[serde(default)]
    pub double_mesh: bool,
    #[serde(default)]
    pub waste_percent: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlabResult {
    pub concrete: ConcreteQuantity,
    pub bars_along_length: u32,
    pub bars_along_width: u32,
    pub steel: SteelSchedule,
}

/// Two-way mesh lines over an `length × width` panel.
///
/// Bars running along the length are distributed across the width and the
/// other way round. Shared with the rib slab topping.
pub(crate) fn mesh_lines(
    label: &str,
    length_m: f64,
    width_m: f64,
    cover_m: f64,
    diameter_mm: u32,
    spacing_m: f64,
) -> CalcResult<(u32, u32, Vec<SteelLine>)> {
    let clear_l = length_m - 2.0 * cover_m;
    let clear_w = width_m - 2.0 * cover_m;
    if clear_l <= 0.0 || clear_w <= 0.0 {
        return Err(CalcError::OutOfRange {
            field: "cover_m",
            reason: "cover exceeds half the panel size".to_string(),
        });
    }

    let along_length = steel::bars_for_spacing(clear_w, spacing_m)?;
    let along_width = steel::bars_for_spacing(clear_l, spacing_m)?;

    Ok((
        along_length,
        along_width,
        vec![
            SteelLine::new(format!("{label} (along length)"), diameter_mm, along_length, clear_l),
            SteelLine::new(format!("{label} (along width)"), diameter_mm, along_width, clear_w),
        ],
    ))
}

pub fn slab_quantities(input: &SlabInput) -> CalcResult<SlabResult> {
    let l = positive("length_m", input.length_m)?;
    let w = positive("width_m", input.width_m)?;
    let t = positive("thickness_m", input.thickness_m)?;
    let cover = positive("cover_m", input.cover_m)?;
    let spacing = positive("spacing_m", input.spacing_m)?;
    let d = steel::validate_diameter(input.bar_diameter_mm)?;

    let (along_length, along_width, mut lines) = mesh_lines("bottom mesh", l, w, cover, d, spacing)?;
    if input.double_mesh {
        let (_, _, top) = mesh_lines("top mesh", l, w, cover, d, spacing)?;
        lines.extend(top);
    }

    let concrete = ConcreteQuantity::build(l * w * t, 1, 0.0, input.waste_percent)?;

    Ok(SlabResult {
        concrete,
        bars_along_length: along_length,
        bars_along_width: along_width,
        steel: SteelSchedule::from_lines(lines),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slab(double_mesh: bool) -> SlabInput {
        SlabInput {
            length_m: 6.0,
            width_m: 4.0,
            thickness_m: 0.15,
            cover_m: 0.02,
            bar_diameter_mm: 10,
            spacing_m: 0.15,
            double_mesh,
            waste_percent: None,
        }
    }

    #[test]
    fn slab_mesh_counts() {
        let result = slab_quantities(&slab(false)).unwrap();
        assert_eq!(result.concrete.total_volume_m3, 3.6);
        // clear width 3.96 / 0.15 = 26.4 -> 27 + 1
        assert_eq!(result.bars_along_length, 28);
        // clear length 5.96 / 0.15 = 39.7 -> 40 + 1
        assert_eq!(result.bars_along_width, 41);
        assert_eq!(result.steel.lines.len(), 2);
        assert_eq!(result.steel.lines[0].bar_length_m, 5.96);
    }

    #[test]
    fn double_mesh_doubles_steel() {
        let single = slab_quantities(&slab(false)).unwrap();
        let double = slab_quantities(&slab(true)).unwrap();
        assert_eq!(double.steel.lines.len(), 4);
        assert!((double.steel.total_weight_kg - 2.0 * single.steel.total_weight_kg).abs() < 0.02);
    }

    #[test]
    fn oversized_panel_is_rejected() {
        let mut huge = slab(false);
        huge.length_m = 1e300;
        huge.width_m = 1e300;
        assert!(matches!(
            slab_quantities(&huge),
            Err(CalcError::OutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_zero_spacing() {
        let mut bad = slab(false);
        bad.spacing_m = 0.0;
        assert_eq!(
            slab_quantities(&bad).unwrap_err(),
            CalcError::NotPositive { field: "spacing_m" }
        );
    }
}
