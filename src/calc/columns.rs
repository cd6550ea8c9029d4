//! Column dimension sizing
//!
//! Sizes a column from the slab area it carries, the number of floors and a
//! building-type load table, using the axial capacity
//! `Pu = Ac (0.35 fcu + 0.67 μ fy)`.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::steel::{self, SteelLine, SteelSchedule};
use super::{ceil_to, count, finite_result, positive, round2, within, CalcError, CalcResult};

/// Ultimate load factor applied to the service load table.
pub const LOAD_FACTOR: f64 = 1.5;

pub const MIN_SQUARE_SIDE_CM: f64 = 35.0;
pub const MIN_RECT_WIDTH_CM: f64 = 25.0;
pub const MIN_RECT_DEPTH_CM: f64 = 40.0;
pub const MIN_CIRCULAR_DIAMETER_CM: f64 = 30.0;
/// Depth may not exceed this multiple of the width.
pub const MAX_RECT_ASPECT: f64 = 4.0;

/// Largest slab area one column may carry, m².
pub const MAX_TRIBUTARY_AREA_M2: f64 = 10_000.0;
pub const MAX_FLOORS: u32 = 200;

const TIE_DIAMETER_MM: u32 = 8;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    Residential,
    Administrative,
    Commercial,
    Public,
    Industrial,
}

impl BuildingType {
    pub const ALL: [BuildingType; 5] = [
        Self::Residential,
        Self::Administrative,
        Self::Commercial,
        Self::Public,
        Self::Industrial,
    ];

    /// Service load per m² of slab per floor, kN/m².
    pub fn floor_load_kn_m2(self) -> f64 {
        match self {
            Self::Residential => 10.0,
            Self::Administrative => 11.0,
            Self::Commercial => 12.0,
            Self::Public => 13.0,
            Self::Industrial => 15.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColumnShape {
    Square,
    Rectangular,
    Circular,
}

fn default_fcu() -> f64 {
    25.0
}

fn default_fy() -> f64 {
    360.0
}

fn default_steel_ratio() -> f64 {
    0.01
}

fn default_main_bar() -> u32 {
    16
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSizingInput {
    pub slab_area_m2: f64,
    pub floors: u32,
    pub building_type: BuildingType,
    pub shape: ColumnShape,
    #[serde(default = "default_fcu")]
    pub concrete_grade_mpa: f64,
    #[serde(default = "default_fy")]
    pub steel_grade_mpa: f64,
    #[serde(default = "default_steel_ratio")]
    pub steel_ratio: f64,
    #[serde(default = "default_main_bar")]
    pub main_bar_diameter_mm: u32,
}

/// Cross-section chosen for a column, in centimetres.
///
/// For circular columns `width_cm == depth_cm == diameter`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ColumnDimensions {
    pub shape: ColumnShape,
    pub width_cm: f64,
    pub depth_cm: f64,
}

impl ColumnDimensions {
    pub fn gross_area_mm2(&self) -> f64 {
        match self.shape {
            ColumnShape::Circular => {
                let d = self.width_cm * 10.0;
                PI * d * d / 4.0
            }
            _ => self.width_cm * 10.0 * self.depth_cm * 10.0,
        }
    }

    pub fn least_dimension_mm(&self) -> f64 {
        self.width_cm.min(self.depth_cm) * 10.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnSizingResult {
    pub design_load_kn: f64,
    pub required_area_cm2: f64,
    pub provided_area_cm2: f64,
    pub dimensions: ColumnDimensions,
    pub main_bars: u32,
    pub main_bar_diameter_mm: u32,
    pub steel_area_cm2: f64,
    pub tie_diameter_mm: u32,
    pub tie_spacing_mm: f64,
    /// Reinforcement per metre of column height.
    pub steel_per_metre: SteelSchedule,
}

pub fn size_column(input: &ColumnSizingInput) -> CalcResult<ColumnSizingResult> {
    let area = positive("slab_area_m2", input.slab_area_m2)?;
    if area > MAX_TRIBUTARY_AREA_M2 {
        return Err(CalcError::OutOfRange {
            field: "slab_area_m2",
            reason: format!("must be at most {MAX_TRIBUTARY_AREA_M2} m²"),
        });
    }
    let floors = count("floors", input.floors)?;
    if floors > MAX_FLOORS {
        return Err(CalcError::OutOfRange {
            field: "floors",
            reason: format!("must be at most {MAX_FLOORS}"),
        });
    }
    let fcu = within("concrete_grade_mpa", input.concrete_grade_mpa, 15.0, 60.0)?;
    let fy = within("steel_grade_mpa", input.steel_grade_mpa, 240.0, 520.0)?;
    let ratio = within("steel_ratio", input.steel_ratio, 0.008, 0.04)?;
    let bar = steel::validate_diameter(input.main_bar_diameter_mm)?;

    let design_load_kn =
        area * f64::from(floors) * input.building_type.floor_load_kn_m2() * LOAD_FACTOR;
    let required_mm2 = finite_result(
        "slab_area_m2",
        design_load_kn * 1000.0 / (0.35 * fcu + 0.67 * ratio * fy),
    )?;

    let dimensions = dimension_for(input.shape, required_mm2)?;
    let provided_mm2 = dimensions.gross_area_mm2();
    let steel_mm2 = ratio * provided_mm2;

    let min_bars = match input.shape {
        ColumnShape::Circular => 6,
        _ => 4,
    };
    let mut main_bars = steel::bars_for_area("steel_ratio", steel_mm2, bar, min_bars)?;
    if input.shape == ColumnShape::Rectangular && main_bars % 2 == 1 {
        main_bars += 1;
    }

    let tie_spacing_mm = (15.0 * f64::from(bar))
        .min(dimensions.least_dimension_mm())
        .min(200.0);

    let steel_per_metre = SteelSchedule::from_lines(vec![
        SteelLine::new("main bars", bar, main_bars, 1.0),
        SteelLine::new(
            "ties",
            TIE_DIAMETER_MM,
            (1000.0 / tie_spacing_mm).ceil() as u32,
            tie_length_m(&dimensions),
        ),
    ]);

    tracing::debug!(
        design_load_kn,
        required_mm2,
        shape = ?input.shape,
        "Sized column"
    );

    Ok(ColumnSizingResult {
        design_load_kn: round2(design_load_kn),
        required_area_cm2: round2(required_mm2 / 100.0),
        provided_area_cm2: round2(provided_mm2 / 100.0),
        dimensions,
        main_bars,
        main_bar_diameter_mm: bar,
        steel_area_cm2: round2(steel_mm2 / 100.0),
        tie_diameter_mm: TIE_DIAMETER_MM,
        tie_spacing_mm,
        steel_per_metre,
    })
}

fn dimension_for(shape: ColumnShape, required_mm2: f64) -> CalcResult<ColumnDimensions> {
    let dimensions = match shape {
        ColumnShape::Square => {
            let side = ceil_to(required_mm2.sqrt() / 10.0, 5.0).max(MIN_SQUARE_SIDE_CM);
            ColumnDimensions {
                shape,
                width_cm: side,
                depth_cm: side,
            }
        }
        ColumnShape::Rectangular => {
            // No width below sqrt(Ac / aspect) can keep the depth within the aspect limit.
            let narrowest = (required_mm2 / MAX_RECT_ASPECT).sqrt() / 10.0;
            let mut width = ((narrowest / 5.0).floor() * 5.0).max(MIN_RECT_WIDTH_CM);
            let mut fitted = None;
            for _ in 0..8 {
                let depth =
                    ceil_to(required_mm2 / (width * 10.0) / 10.0, 5.0).max(MIN_RECT_DEPTH_CM);
                if depth <= MAX_RECT_ASPECT * width {
                    fitted = Some(ColumnDimensions {
                        shape,
                        width_cm: width,
                        depth_cm: depth,
                    });
                    break;
                }
                width += 5.0;
            }
            fitted.ok_or_else(|| CalcError::OutOfRange {
                field: "slab_area_m2",
                reason: "no rectangular section satisfies the aspect limit".to_string(),
            })?
        }
        ColumnShape::Circular => {
            let diameter = ceil_to((4.0 * required_mm2 / PI).sqrt() / 10.0, 5.0)
                .max(MIN_CIRCULAR_DIAMETER_CM);
            ColumnDimensions {
                shape,
                width_cm: diameter,
                depth_cm: diameter,
            }
        }
    };

    finite_result("slab_area_m2", dimensions.width_cm)?;
    finite_result("slab_area_m2", dimensions.depth_cm)?;
    Ok(dimensions)
}

/// Tie perimeter with 40 mm cover plus hooks.
fn tie_length_m(dim: &ColumnDimensions) -> f64 {
    let cover = 0.04;
    let hooks = 2.0 * steel::HOOK_DIAMETERS * f64::from(TIE_DIAMETER_MM) / 1000.0;
    match dim.shape {
        ColumnShape::Circular => PI * (dim.width_cm / 100.0 - 2.0 * cover) + hooks,
        _ => {
            2.0 * ((dim.width_cm / 100.0 - 2.0 * cover) + (dim.depth_cm / 100.0 - 2.0 * cover))
                + hooks
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(area: f64, floors: u32, shape: ColumnShape) -> ColumnSizingInput {
        ColumnSizingInput {
            slab_area_m2: area,
            floors,
            building_type: BuildingType::Residential,
            shape,
            concrete_grade_mpa: 25.0,
            steel_grade_mpa: 360.0,
            steel_ratio: 0.01,
            main_bar_diameter_mm: 16,
        }
    }

    #[test]
    fn square_column_from_tributary_area() {
        // 20 m² × 5 floors × 10 kN/m² × 1.5 = 1500 kN
        let result = size_column(&input(20.0, 5, ColumnShape::Square)).unwrap();
        assert_eq!(result.design_load_kn, 1500.0);
        // Ac ≈ 134 384 mm², side ≈ 36.7 cm -> 40 cm
        assert_eq!(result.dimensions.width_cm, 40.0);
        assert_eq!(result.dimensions.depth_cm, 40.0);
        // As = 1600 mm² -> 8 Ø16
        assert_eq!(result.main_bars, 8);
        assert_eq!(result.tie_spacing_mm, 200.0);
    }

    #[test]
    fn small_load_hits_square_floor() {
        let result = size_column(&input(4.0, 1, ColumnShape::Square)).unwrap();
        assert_eq!(result.dimensions.width_cm, MIN_SQUARE_SIDE_CM);
        // 1 % of 35 × 35 cm = 1225 mm² -> 7 Ø16
        assert_eq!(result.main_bars, 7);
    }

    #[test]
    fn rectangular_keeps_aspect_ratio() {
        let result = size_column(&input(30.0, 10, ColumnShape::Rectangular)).unwrap();
        let dim = result.dimensions;
        assert!(dim.width_cm >= MIN_RECT_WIDTH_CM);
        assert!(dim.depth_cm <= MAX_RECT_ASPECT * dim.width_cm);
        assert!(dim.gross_area_mm2() / 100.0 >= result.required_area_cm2);
        assert_eq!(result.main_bars % 2, 0);
    }

    #[test]
    fn small_rectangular_uses_minimums() {
        let result = size_column(&input(4.0, 1, ColumnShape::Rectangular)).unwrap();
        assert_eq!(result.dimensions.width_cm, 25.0);
        assert_eq!(result.dimensions.depth_cm, 40.0);
    }

    #[test]
    fn circular_has_six_bars_minimum() {
        let result = size_column(&input(4.0, 1, ColumnShape::Circular)).unwrap();
        assert_eq!(result.dimensions.width_cm, MIN_CIRCULAR_DIAMETER_CM);
        assert!(result.main_bars >= 6);
    }

    #[test]
    fn heavier_building_type_needs_more_area() {
        let mut industrial = input(20.0, 5, ColumnShape::Square);
        industrial.building_type = BuildingType::Industrial;
        let res = size_column(&input(20.0, 5, ColumnShape::Square)).unwrap();
        let ind = size_column(&industrial).unwrap();
        assert!(ind.required_area_cm2 > res.required_area_cm2);
    }

    #[test]
    fn rectangular_takes_narrowest_width_within_aspect() {
        // Ac ≈ 403 154 mm²: 30 cm would need 135 cm depth (> 4 × 30), 35 cm needs 120 cm.
        let result = size_column(&input(30.0, 10, ColumnShape::Rectangular)).unwrap();
        assert_eq!(result.dimensions.width_cm, 35.0);
        assert_eq!(result.dimensions.depth_cm, 120.0);
    }

    #[test]
    fn huge_tributary_area_is_rejected_for_every_shape() {
        for shape in [ColumnShape::Square, ColumnShape::Rectangular, ColumnShape::Circular] {
            assert!(matches!(
                size_column(&input(1e306, 5, shape)),
                Err(CalcError::OutOfRange { field: "slab_area_m2", .. })
            ));
        }
        let mut tall = input(20.0, 5, ColumnShape::Square);
        tall.floors = 5_000;
        assert!(matches!(
            size_column(&tall),
            Err(CalcError::OutOfRange { field: "floors", .. })
        ));
    }

    #[test]
    fn largest_accepted_load_still_sizes_a_rectangle() {
        let mut heavy = input(MAX_TRIBUTARY_AREA_M2, MAX_FLOORS, ColumnShape::Rectangular);
        heavy.building_type = BuildingType::Industrial;
        heavy.concrete_grade_mpa = 15.0;
        heavy.steel_ratio = 0.008;
        heavy.steel_grade_mpa = 240.0;
        let dim = size_column(&heavy).unwrap().dimensions;
        assert!(dim.width_cm.is_finite());
        assert!(dim.depth_cm <= MAX_RECT_ASPECT * dim.width_cm);
    }

    #[test]
    fn rejects_zero_floors_and_bad_ratio() {
        assert!(size_column(&input(20.0, 0, ColumnShape::Square)).is_err());
        let mut bad = input(20.0, 2, ColumnShape::Square);
        bad.steel_ratio = 0.1;
        assert!(size_column(&bad).is_err());
    }
}
