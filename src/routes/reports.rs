//! Quantity report routes
//!
//! Reports are stored by the backend. Creation re-runs the calculation here
//! so the saved numbers always match the formulas.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::api::{AppJson, Created, DataResponse, MessageResponse, Paginated, PaginationParams};
use crate::app::AppState;
use crate::auth::Caller;
use crate::calc::CalculationRequest;
use crate::domain::{CreateQuantityReportRequest, NewQuantityReport, ReportFilter};
use crate::error::{ApiError, ApiResult};

use super::calculations::resolve_column_dimensions;
use super::session_id;

/// GET /quantity-reports
///
/// Filters (`projectId`, `ownerId`, `engineerId`, `sentToOwner`) are passed
/// to the backend; paging happens here.
pub async fn list_reports(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ReportFilter>,
    Query(pagination): Query<PaginationParams>,
) -> ApiResult<impl IntoResponse> {
    tracing::info!(
        project_id = ?filter.project_id,
        owner_id = ?filter.owner_id,
        page = pagination.page(),
        "Listing quantity reports"
    );

    let mut reports = state.backend.list_quantity_reports(&caller, &filter).await?;
    // Newest first; reports without a timestamp sink to the end.
    reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(Paginated::from_all(reports, &pagination))
}

/// POST /quantity-reports
pub async fn create_report(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    AppJson(mut req): AppJson<CreateQuantityReportRequest>,
) -> ApiResult<impl IntoResponse> {
    req.project_id = req.project_id.trim().to_string();
    if req.project_id.is_empty() {
        return Err(ApiError::BadRequest("projectId is required".to_string()));
    }

    let session = session_id(&headers)?;
    if let CalculationRequest::ColumnConcrete(input) = &mut req.calculation {
        resolve_column_dimensions(&state, session.as_deref(), input).await;
    }
    let outcome = req.calculation.compute()?;

    // The project must exist; it also supplies the owner when the client left it out.
    let project = state.backend.get_project(&caller, &req.project_id).await?;
    if req.owner_id.is_none() {
        req.owner_id = project.owner_id.clone();
    }
    if req.send_to_owner && req.owner_id.is_none() {
        return Err(ApiError::BadRequest(
            "Project has no owner to send the report to".to_string(),
        ));
    }

    let report = NewQuantityReport::from_outcome(&req, outcome);
    let saved = state.backend.create_quantity_report(&caller, &report).await?;

    tracing::info!(
        report_id = %saved.id,
        project_id = %saved.project_id,
        calculation_type = %saved.calculation_type,
        sent_to_owner = saved.sent_to_owner,
        "Quantity report saved"
    );

    Ok(Created(DataResponse::with_message(
        "Quantity report saved",
        saved,
    )))
}

/// GET /quantity-reports/:report_id
pub async fn get_report(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Path(report_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let report = state.backend.get_quantity_report(&caller, &report_id).await?;
    Ok(DataResponse::new(report))
}

/// POST /quantity-reports/:report_id/send
pub async fn send_to_owner(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Path(report_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let report = state.backend.get_quantity_report(&caller, &report_id).await?;
    if report.sent_to_owner {
        return Ok(DataResponse::with_message(
            "Report was already sent to the owner",
            report,
        ));
    }
    if report.owner_id.is_none() {
        return Err(ApiError::BadRequest(
            "Report has no owner to send it to".to_string(),
        ));
    }

    let report = state.backend.send_report_to_owner(&caller, &report_id).await?;
    tracing::info!(report_id = %report.id, "Quantity report sent to owner");
    Ok(DataResponse::with_message("Report sent to owner", report))
}

/// DELETE /quantity-reports/:report_id
pub async fn delete_report(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Path(report_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state
        .backend
        .delete_quantity_report(&caller, &report_id)
        .await?;
    tracing::info!(report_id = %report_id, "Quantity report deleted");
    Ok(MessageResponse::new("Quantity report deleted"))
}
