//! Concrete volumes for footings, columns and foundations.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::columns::{ColumnDimensions, ColumnShape};
use super::{count, finite_result, non_negative, positive, round3, with_waste, CalcError, CalcResult};

/// Default blinding projection beyond the element on every side.
pub const DEFAULT_BLINDING_PROJECTION_M: f64 = 0.10;

fn one() -> u32 {
    1
}

/// Volume breakdown returned by every concrete calculator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConcreteQuantity {
    pub count: u32,
    pub unit_volume_m3: f64,
    pub element_volume_m3: f64,
    pub blinding_volume_m3: f64,
    pub total_volume_m3: f64,
    /// Total including the waste allowance.
    pub order_volume_m3: f64,
}

impl ConcreteQuantity {
    pub(crate) fn build(
        unit_volume: f64,
        count: u32,
        blinding_unit: f64,
        waste_percent: Option<f64>,
    ) -> CalcResult<Self> {
        let n = f64::from(count);
        let element = unit_volume * n;
        let blinding = blinding_unit * n;
        let total = element + blinding;
        // Every other figure is at most the order volume.
        let order = finite_result("dimensions", round3(with_waste(total, waste_percent)?))?;
        Ok(Self {
            count,
            unit_volume_m3: round3(unit_volume),
            element_volume_m3: round3(element),
            blinding_volume_m3: round3(blinding),
            total_volume_m3: round3(total),
            order_volume_m3: order,
        })
    }
}

/// Optional lean-concrete layer under a footing or foundation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blinding {
    pub thickness_m: f64,
    #[serde(default)]
    pub projection_m: Option<f64>,
}

impl Blinding {
    fn volume(&self, length_m: f64, width_m: f64) -> CalcResult<f64> {
        let t = non_negative("blinding.thickness_m", self.thickness_m)?;
        let p = non_negative(
            "blinding.projection_m",
            self.projection_m.unwrap_or(DEFAULT_BLINDING_PROJECTION_M),
        )?;
        Ok((length_m + 2.0 * p) * (width_m + 2.0 * p) * t)
    }
}

fn blinding_volume(blinding: Option<&Blinding>, length_m: f64, width_m: f64) -> CalcResult<f64> {
    blinding.map_or(Ok(0.0), |b| b.volume(length_m, width_m))
}

// ============================================================================
// Footings
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FootingInput {
    pub length_m: f64,
    pub width_m: f64,
    pub thickness_m: f64,
    #[serde(default = "one")]
    pub count: u32,
    #[serde(default)]
    pub blinding: Option<Blinding>,
    #[serde(default)]
    pub waste_percent: Option<f64>,
}

pub fn footing_volume(input: &FootingInput) -> CalcResult<ConcreteQuantity> {
    let l = positive("length_m", input.length_m)?;
    let w = positive("width_m", input.width_m)?;
    let t = positive("thickness_m", input.thickness_m)?;
    let n = count("count", input.count)?;

    let blinding = blinding_volume(input.blinding.as_ref(), l, w)?;
    ConcreteQuantity::build(l * w * t, n, blinding, input.waste_percent)
}

// ============================================================================
// Columns
// ============================================================================

/// Column concrete input. For circular columns `width_m` is the diameter and
/// a square column given only `width_m` has `depth_m == width_m`.
///
/// Shape, width and depth may all be omitted when a previous column sizing is
/// available; see [`ColumnConcreteInput::fill_from`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnConcreteInput {
    #[serde(default)]
    pub shape: Option<ColumnShape>,
    #[serde(default)]
    pub width_m: Option<f64>,
    #[serde(default)]
    pub depth_m: Option<f64>,
    pub height_m: f64,
    #[serde(default = "one")]
    pub count: u32,
    #[serde(default)]
    pub waste_percent: Option<f64>,
}

impl ColumnConcreteInput {
    /// True when the caller gave no cross-section at all.
    pub fn needs_section(&self) -> bool {
        self.width_m.is_none() && self.depth_m.is_none()
    }

    /// Take the cross-section from a sized column (cm -> m).
    ///
    /// Only applies when no dimension was given and the shape, if given,
    /// matches the sizing. Returns whether the input was filled.
    pub fn fill_from(&mut self, dims: &ColumnDimensions) -> bool {
        if !self.needs_section() || self.shape.is_some_and(|shape| shape != dims.shape) {
            return false;
        }
        self.shape = Some(dims.shape);
        self.width_m = Some(dims.width_cm / 100.0);
        self.depth_m = Some(dims.depth_cm / 100.0);
        true
    }
}

pub fn column_volume(input: &ColumnConcreteInput) -> CalcResult<ConcreteQuantity> {
    let h = positive("height_m", input.height_m)?;
    let n = count("count", input.count)?;
    let width = input.width_m.ok_or_else(|| {
        CalcError::MissingInput("width_m is required when no column sizing is available".into())
    })?;
    let w = positive("width_m", width)?;
    let shape = input.shape.ok_or_else(|| {
        CalcError::MissingInput("shape is required when no column sizing is available".into())
    })?;

    let section = match shape {
        ColumnShape::Circular => PI * w * w / 4.0,
        ColumnShape::Square => w * positive("depth_m", input.depth_m.unwrap_or(w))?,
        ColumnShape::Rectangular => {
            let depth = input.depth_m.ok_or_else(|| {
                CalcError::MissingInput("depth_m is required for rectangular columns".into())
            })?;
            w * positive("depth_m", depth)?
        }
    };

    ConcreteQuantity::build(section * h, n, 0.0, input.waste_percent)
}

// ============================================================================
// Foundations
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FoundationInput {
    /// Continuous strip under walls; `total_length_m` is the summed run.
    Strip {
        total_length_m: f64,
        width_m: f64,
        thickness_m: f64,
        #[serde(default)]
        blinding: Option<Blinding>,
        #[serde(default)]
        waste_percent: Option<f64>,
    },
    /// Single mat under the whole building.
    Raft {
        length_m: f64,
        width_m: f64,
        thickness_m: f64,
        #[serde(default)]
        blinding: Option<Blinding>,
        #[serde(default)]
        waste_percent: Option<f64>,
    },
}

pub fn foundation_volume(input: &FoundationInput) -> CalcResult<ConcreteQuantity> {
    match input {
        FoundationInput::Strip {
            total_length_m,
            width_m,
            thickness_m,
            blinding,
            waste_percent,
        } => {
            let l = positive("total_length_m", *total_length_m)?;
            let w = positive("width_m", *width_m)?;
            let t = positive("thickness_m", *thickness_m)?;
            // A strip's blinding only projects sideways; the run length is continuous.
            let blinding = match blinding {
                Some(b) => {
                    let t_b = non_negative("blinding.thickness_m", b.thickness_m)?;
                    let p = non_negative(
                        "blinding.projection_m",
                        b.projection_m.unwrap_or(DEFAULT_BLINDING_PROJECTION_M),
                    )?;
                    l * (w + 2.0 * p) * t_b
                }
                None => 0.0,
            };
            ConcreteQuantity::build(l * w * t, 1, blinding, *waste_percent)
        }
        FoundationInput::Raft {
            length_m,
            width_m,
            thickness_m,
            blinding,
            waste_percent,
        } => {
            let l = positive("length_m", *length_m)?;
            let w = positive("width_m", *width_m)?;
            let t = positive("thickness_m", *thickness_m)?;
            let blinding = blinding_volume(blinding.as_ref(), l, w)?;
            ConcreteQuantity::build(l * w * t, 1, blinding, *waste_percent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footing_box_times_count() {
        let q = footing_volume(&FootingInput {
            length_m: 2.0,
            width_m: 1.5,
            thickness_m: 0.5,
            count: 4,
            blinding: None,
            waste_percent: None,
        })
        .unwrap();
        assert_eq!(q.unit_volume_m3, 1.5);
        assert_eq!(q.element_volume_m3, 6.0);
        assert_eq!(q.total_volume_m3, 6.0);
    }

    #[test]
    fn footing_blinding_projects_on_all_sides() {
        let q = footing_volume(&FootingInput {
            length_m: 2.0,
            width_m: 2.0,
            thickness_m: 0.5,
            count: 1,
            blinding: Some(Blinding {
                thickness_m: 0.1,
                projection_m: None,
            }),
            waste_percent: Some(5.0),
        })
        .unwrap();
        // 2.2 × 2.2 × 0.1
        assert_eq!(q.blinding_volume_m3, 0.484);
        assert_eq!(q.total_volume_m3, 2.484);
        assert_eq!(q.order_volume_m3, 2.608);
    }

    #[test]
    fn footing_rejects_zero_dimension() {
        let err = footing_volume(&FootingInput {
            length_m: 0.0,
            width_m: 1.0,
            thickness_m: 0.5,
            count: 1,
            blinding: None,
            waste_percent: None,
        })
        .unwrap_err();
        assert_eq!(err, CalcError::NotPositive { field: "length_m" });
    }

    #[test]
    fn circular_column_is_a_cylinder() {
        let q = column_volume(&ColumnConcreteInput {
            shape: Some(ColumnShape::Circular),
            width_m: Some(0.4),
            depth_m: None,
            height_m: 3.0,
            count: 10,
            waste_percent: None,
        })
        .unwrap();
        // π × 0.2² × 3 × 10
        assert_eq!(q.element_volume_m3, 3.77);
    }

    fn column(shape: Option<ColumnShape>, width_m: Option<f64>) -> ColumnConcreteInput {
        ColumnConcreteInput {
            shape,
            width_m,
            depth_m: None,
            height_m: 3.0,
            count: 2,
            waste_percent: None,
        }
    }

    #[test]
    fn column_dimensions_fill_from_sizing() {
        let mut input = column(None, None);
        assert!(input.needs_section());
        assert!(input.fill_from(&ColumnDimensions {
            shape: ColumnShape::Rectangular,
            width_cm: 25.0,
            depth_cm: 60.0,
        }));
        assert_eq!(input.shape, Some(ColumnShape::Rectangular));
        let q = column_volume(&input).unwrap();
        assert_eq!(q.element_volume_m3, 0.9);
    }

    #[test]
    fn explicit_square_width_is_not_replaced_by_sizing() {
        let mut input = column(Some(ColumnShape::Square), Some(0.5));
        input.count = 1;
        let direct = column_volume(&input).unwrap();
        assert_eq!(direct.element_volume_m3, 0.75);

        let sized = ColumnDimensions {
            shape: ColumnShape::Circular,
            width_cm: 30.0,
            depth_cm: 30.0,
        };
        assert!(!input.fill_from(&sized));
        assert_eq!(input.shape, Some(ColumnShape::Square));
        assert_eq!(column_volume(&input).unwrap(), direct);
    }

    #[test]
    fn sizing_of_another_shape_is_ignored() {
        let mut input = column(Some(ColumnShape::Square), None);
        assert!(!input.fill_from(&ColumnDimensions {
            shape: ColumnShape::Circular,
            width_cm: 30.0,
            depth_cm: 30.0,
        }));
        assert!(input.needs_section());
        assert!(matches!(column_volume(&input), Err(CalcError::MissingInput(_))));
    }

    #[test]
    fn column_without_shape_is_missing_input() {
        let err = column_volume(&column(None, Some(0.4))).unwrap_err();
        assert_eq!(
            err,
            CalcError::MissingInput("shape is required when no column sizing is available".into())
        );
    }

    #[test]
    fn overflowing_volume_is_rejected() {
        let err = footing_volume(&FootingInput {
            length_m: 1e200,
            width_m: 1e200,
            thickness_m: 1.0,
            count: 1,
            blinding: None,
            waste_percent: None,
        })
        .unwrap_err();
        assert!(matches!(err, CalcError::OutOfRange { field: "dimensions", .. }));
    }

    #[test]
    fn column_without_width_is_missing_input() {
        let err = column_volume(&ColumnConcreteInput {
            shape: Some(ColumnShape::Square),
            width_m: None,
            depth_m: None,
            height_m: 3.0,
            count: 1,
            waste_percent: None,
        })
        .unwrap_err();
        assert!(matches!(err, CalcError::MissingInput(_)));
    }

    #[test]
    fn strip_and_raft_foundations() {
        let strip = foundation_volume(&FoundationInput::Strip {
            total_length_m: 40.0,
            width_m: 0.8,
            thickness_m: 0.4,
            blinding: Some(Blinding {
                thickness_m: 0.1,
                projection_m: Some(0.1),
            }),
            waste_percent: None,
        })
        .unwrap();
        assert_eq!(strip.element_volume_m3, 12.8);
        assert_eq!(strip.blinding_volume_m3, 4.0);

        let raft = foundation_volume(&FoundationInput::Raft {
            length_m: 12.0,
            width_m: 10.0,
            thickness_m: 0.6,
            blinding: None,
            waste_percent: None,
        })
        .unwrap();
        assert_eq!(raft.total_volume_m3, 72.0);
    }
}
