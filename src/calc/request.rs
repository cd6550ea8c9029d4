//! Tagged calculation requests and their report payloads.

use serde::{Deserialize, Serialize};

use super::beams::{beam_quantities, BeamInput};
use super::columns::{size_column, ColumnSizingInput};
use super::concrete::{
    column_volume, footing_volume, foundation_volume, ColumnConcreteInput, ConcreteQuantity,
    FootingInput, FoundationInput,
};
use super::ribs::{rib_slab_quantities, RibSlabInput};
use super::slabs::{slab_quantities, SlabInput};
use super::steel::SteelSchedule;
use super::{CalcError, CalcResult};

/// The `calculationType` tag stored on quantity reports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CalculationType {
    ColumnSizing,
    FootingConcrete,
    ColumnConcrete,
    FoundationConcrete,
    BeamQuantities,
    SlabQuantities,
    RibSlabQuantities,
}

impl CalculationType {
    pub const ALL: [CalculationType; 7] = [
        Self::ColumnSizing,
        Self::FootingConcrete,
        Self::ColumnConcrete,
        Self::FoundationConcrete,
        Self::BeamQuantities,
        Self::SlabQuantities,
        Self::RibSlabQuantities,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ColumnSizing => "column-sizing",
            Self::FootingConcrete => "footing-concrete",
            Self::ColumnConcrete => "column-concrete",
            Self::FoundationConcrete => "foundation-concrete",
            Self::BeamQuantities => "beam-quantities",
            Self::SlabQuantities => "slab-quantities",
            Self::RibSlabQuantities => "rib-slab-quantities",
        }
    }
}

impl std::fmt::Display for CalculationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CalculationType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CalcError::UnknownCalculationType(s.to_string()))
    }
}

/// A calculator invocation: `{"type": "footing-concrete", "input": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "input", rename_all = "kebab-case")]
pub enum CalculationRequest {
    ColumnSizing(ColumnSizingInput),
    FootingConcrete(FootingInput),
    ColumnConcrete(ColumnConcreteInput),
    FoundationConcrete(FoundationInput),
    BeamQuantities(BeamInput),
    SlabQuantities(SlabInput),
    RibSlabQuantities(RibSlabInput),
}

/// Result of a calculation in the shape persisted on a quantity report.
///
/// The envelope fields are camelCase like every backend document, while the
/// calculator payloads inside keep their snake_case field names
/// (`concreteData.total_volume_m3`). Inputs are snake_case as well.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalculationOutcome {
    pub calculation_type: CalculationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concrete_data: Option<ConcreteQuantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steel_data: Option<SteelSchedule>,
    /// Full calculator output.
    pub details: serde_json::Value,
}

impl CalculationRequest {
    pub fn calculation_type(&self) -> CalculationType {
        match self {
            Self::ColumnSizing(_) => CalculationType::ColumnSizing,
            Self::FootingConcrete(_) => CalculationType::FootingConcrete,
            Self::ColumnConcrete(_) => CalculationType::ColumnConcrete,
            Self::FoundationConcrete(_) => CalculationType::FoundationConcrete,
            Self::BeamQuantities(_) => CalculationType::BeamQuantities,
            Self::SlabQuantities(_) => CalculationType::SlabQuantities,
            Self::RibSlabQuantities(_) => CalculationType::RibSlabQuantities,
        }
    }

    pub fn compute(&self) -> CalcResult<CalculationOutcome> {
        let calculation_type = self.calculation_type();
        let (concrete_data, steel_data, details) = match self {
            Self::ColumnSizing(input) => {
                let r = size_column(input)?;
                (None, Some(r.steel_per_metre.clone()), to_value(&r))
            }
            Self::FootingConcrete(input) => {
                let r = footing_volume(input)?;
                (Some(r.clone()), None, to_value(&r))
            }
            Self::ColumnConcrete(input) => {
                let r = column_volume(input)?;
                (Some(r.clone()), None, to_value(&r))
            }
            Self::FoundationConcrete(input) => {
                let r = foundation_volume(input)?;
                (Some(r.clone()), None, to_value(&r))
            }
            Self::BeamQuantities(input) => {
                let r = beam_quantities(input)?;
                (Some(r.concrete.clone()), Some(r.steel.clone()), to_value(&r))
            }
            Self::SlabQuantities(input) => {
                let r = slab_quantities(input)?;
                (Some(r.concrete.clone()), Some(r.steel.clone()), to_value(&r))
            }
            Self::RibSlabQuantities(input) => {
                let r = rib_slab_quantities(input)?;
                (Some(r.concrete.clone()), Some(r.steel.clone()), to_value(&r))
            }
        };

        Ok(CalculationOutcome {
            calculation_type,
            concrete_data,
            steel_data,
            details,
        })
    }
}

// Calculator results are plain structs of numbers and strings.
fn to_value<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}
