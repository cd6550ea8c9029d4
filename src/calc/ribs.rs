//! Ribbed roof slabs with hollow blocks.
//!
//! Ribs run along `length_m`. Between neighbouring ribs sits one row of
//! blocks; the slab is topped with a thin concrete layer and a shrinkage mesh.

use serde::{Deserialize, Serialize};

use super::concrete::ConcreteQuantity;
use super::slabs::mesh_lines;
use super::steel::{self, SteelLine, SteelSchedule};
use super::{count, mul_count, positive, to_count, CalcError, CalcResult};

const TOPPING_COVER_M: f64 = 0.02;

fn default_rib_width() -> f64 {
    0.12
}
fn default_block_width() -> f64 {
    0.40
}
fn default_block_length() -> f64 {
    0.20
}
fn default_block_height() -> f64 {
    0.20
}
fn default_topping() -> f64 {
    0.05
}
fn default_rib_bar() -> u32 {
    12
}
fn default_bars_per_rib() -> u32 {
    2
}
fn default_mesh_bar() -> u32 {
    6
}
fn default_mesh_spacing() -> f64 {
    0.25
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RibSlabInput {
    pub length_m: f64,
    pub width_m: f64,
    #[serde(default = "default_rib_width")]
    pub rib_width_m: f64,
    #[serde(default = "default_block_width")]
    pub block_width_m: f64,
    #[serde(default = "default_block_length")]
    pub block_length_m: f64,
    #[serde(default = "default_block_height")]
    pub block_height_m: f64,
    #[serde(default = "default_topping")]
    pub topping_thickness_m: f64,
    #[serde(default = "default_rib_bar")]
    pub rib_bar_diameter_mm: u32,
    #[serde(default = "default_bars_per_rib")]
    pub bars_per_rib: u32,
    #[serde(default = "default_mesh_bar")]
    pub mesh_bar_diameter_mm: u32,
    #[serde(default = "default_mesh_spacing")]
    pub mesh_spacing_m: f64,
    #[serde(default)]
    pub waste_percent: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RibSlabResult {
    pub concrete: ConcreteQuantity,
    pub ribs: u32,
    pub block_rows: u32,
    pub blocks: u32,
    pub steel: SteelSchedule,
}

fn too_wide(field: &'static str) -> CalcError {
    CalcError::OutOfRange {
        field,
        reason: "produces more ribs than a schedule can hold".to_string(),
    }
}

pub fn rib_slab_quantities(input: &RibSlabInput) -> CalcResult<RibSlabResult> {
    let l = positive("length_m", input.length_m)?;
    let w = positive("width_m", input.width_m)?;
    let rib = positive("rib_width_m", input.rib_width_m)?;
    let block_w = positive("block_width_m", input.block_width_m)?;
    let block_l = positive("block_length_m", input.block_length_m)?;
    let block_h = positive("block_height_m", input.block_height_m)?;
    let topping = positive("topping_thickness_m", input.topping_thickness_m)?;
    let bars_per_rib = count("bars_per_rib", input.bars_per_rib)?;
    let spacing = positive("mesh_spacing_m", input.mesh_spacing_m)?;
    let rib_d = steel::validate_diameter(input.rib_bar_diameter_mm)?;
    let mesh_d = steel::validate_diameter(input.mesh_bar_diameter_mm)?;

    let module = rib + block_w;
    let block_rows = to_count("width_m", (w / module + 1e-9).floor())?;
    if block_rows == 0 {
        return Err(CalcError::OutOfRange {
            field: "width_m",
            reason: format!("must fit at least one rib module of {module} m"),
        });
    }
    let ribs = block_rows.checked_add(1).ok_or_else(|| too_wide("width_m"))?;
    let blocks_per_row = to_count("length_m", (l / block_l - 1e-9).ceil())?;
    let blocks = mul_count("length_m", block_rows, blocks_per_row)?;

    let gross = l * w * (block_h + topping);
    let voids = f64::from(blocks) * block_w * block_l * block_h;
    let volume = gross - voids;
    // blocks are whole, so a short run can hold more block than slab
    if volume.is_nan() || volume <= 0.0 {
        return Err(CalcError::OutOfRange {
            field: "length_m",
            reason: format!("blocks of {block_l} m leave no room for concrete"),
        });
    }

    let mut lines = vec![SteelLine::new(
        "rib bars",
        rib_d,
        mul_count("bars_per_rib", ribs, bars_per_rib)?,
        steel::anchored_length_m(l, rib_d),
    )];
    let (_, _, mesh) = mesh_lines("topping mesh", l, w, TOPPING_COVER_M, mesh_d, spacing)?;
    lines.extend(mesh);

    let concrete = ConcreteQuantity::build(volume, 1, 0.0, input.waste_percent)?;

    Ok(RibSlabResult {
        concrete,
        ribs,
        block_rows,
        blocks,
        steel: SteelSchedule::from_lines(lines),
    })
}
