//! Quantity report types
//!
//! A report is the persisted result of one calculation on a project. The
//! engineer saves it and may send it to the project owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calc::{CalculationOutcome, CalculationRequest, CalculationType};

/// Quantity report entity
///
/// `concreteData` and `steelData` hold calculator output verbatim, so their
/// inner fields stay snake_case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityReport {
    pub id: String,
    pub project_id: String,
    #[serde(default)]
    pub engineer_id: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    pub calculation_type: CalculationType,
    #[serde(default)]
    pub concrete_data: Option<serde_json::Value>,
    #[serde(default)]
    pub steel_data: Option<serde_json::Value>,
    #[serde(default)]
    pub sent_to_owner: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request DTO accepted from clients.
///
/// The calculation is re-run here, so the stored numbers never come from
/// the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuantityReportRequest {
    pub project_id: String,
    #[serde(default)]
    pub engineer_id: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    pub calculation: CalculationRequest,
    #[serde(default)]
    pub send_to_owner: bool,
}

/// Body forwarded to the backend `POST /quantity-reports`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuantityReport {
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engineer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    pub calculation_type: CalculationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concrete_data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steel_data: Option<serde_json::Value>,
    pub details: serde_json::Value,
    pub sent_to_owner: bool,
}

impl NewQuantityReport {
    pub fn from_outcome(req: &CreateQuantityReportRequest, outcome: CalculationOutcome) -> Self {
        Self {
            project_id: req.project_id.clone(),
            engineer_id: req.engineer_id.clone(),
            owner_id: req.owner_id.clone(),
            calculation_type: outcome.calculation_type,
            concrete_data: outcome
                .concrete_data
                .and_then(|c| serde_json::to_value(c).ok()),
            steel_data: outcome.steel_data.and_then(|s| serde_json::to_value(s).ok()),
            details: outcome.details,
            sent_to_owner: req.send_to_owner,
        }
    }
}

/// Filters for listing reports; forwarded to the backend as query parameters.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engineer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_to_owner: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_report_carries_recomputed_payloads() {
        let req: CreateQuantityReportRequest = serde_json::from_value(json!({
            "projectId": "p-1",
            "engineerId": "u-9",
            "calculation": {
                "type": "slab-quantities",
                "input": {"length_m": 5.0, "width_m": 4.0, "thickness_m": 0.12}
            },
            "sendToOwner": true
        }))
        .unwrap();
        let outcome = req.calculation.compute().unwrap();
        let report = NewQuantityReport::from_outcome(&req, outcome);

        let wire = serde_json::to_value(&report).unwrap();
        assert_eq!(wire["projectId"], "p-1");
        assert_eq!(wire["calculationType"], "slab-quantities");
        assert_eq!(wire["sentToOwner"], true);
        assert_eq!(wire["concreteData"]["total_volume_m3"], 2.4);
        assert!(wire["steelData"]["total_weight_kg"].as_f64().unwrap() > 0.0);
        assert!(wire.get("ownerId").is_none());
    }

    #[test]
    fn report_tolerates_missing_optional_fields() {
        let report: QuantityReport = serde_json::from_value(json!({
            "id": "r-1",
            "projectId": "p-1",
            "calculationType": "footing-concrete"
        }))
        .unwrap();
        assert!(!report.sent_to_owner);
        assert!(report.concrete_data.is_none());
    }
}
