//! Calculator routes
//!
//! Stateless formula endpoints. The only state touched is the hand-off
//! store: column sizing leaves its dimensions there and column concrete
//! reads them back when the client omits the cross-section.

use axum::{extract::State, http::HeaderMap, response::IntoResponse};
use serde::Serialize;
use std::sync::Arc;

use crate::api::{AppJson, DataResponse};
use crate::app::AppState;
use crate::calc::beams::{beam_quantities, BeamInput};
use crate::calc::columns::{size_column, BuildingType, ColumnDimensions, ColumnSizingInput};
use crate::calc::concrete::{
    column_volume, footing_volume, foundation_volume, ColumnConcreteInput, FootingInput,
    FoundationInput,
};
use crate::calc::ribs::{rib_slab_quantities, RibSlabInput};
use crate::calc::slabs::{slab_quantities, SlabInput};
use crate::calc::steel::{self, BarSpec};
use crate::calc::{CalculationRequest, CalculationType};
use crate::error::ApiResult;
use crate::services::handoff::keys;

use super::session_id;

#[derive(Serialize)]
struct BuildingLoad {
    building_type: BuildingType,
    floor_load_kn_m2: f64,
}

#[derive(Serialize)]
struct ReferenceTables {
    building_loads: Vec<BuildingLoad>,
    bars: Vec<BarSpec>,
    calculation_types: Vec<CalculationType>,
}

/// GET /calculations/reference
pub async fn reference() -> impl IntoResponse {
    DataResponse::new(ReferenceTables {
        building_loads: BuildingType::ALL
            .into_iter()
            .map(|building_type| BuildingLoad {
                building_type,
                floor_load_kn_m2: building_type.floor_load_kn_m2(),
            })
            .collect(),
        bars: steel::catalogue(),
        calculation_types: CalculationType::ALL.to_vec(),
    })
}

/// POST /calculations
///
/// Run any calculator from a tagged request.
pub async fn calculate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    AppJson(mut request): AppJson<CalculationRequest>,
) -> ApiResult<impl IntoResponse> {
    let session = session_id(&headers)?;
    if let CalculationRequest::ColumnConcrete(input) = &mut request {
        resolve_column_dimensions(&state, session.as_deref(), input).await;
    }

    let outcome = request.compute()?;
    if let (CalculationRequest::ColumnSizing(_), Some(session)) = (&request, session.as_deref()) {
        if let Some(dims) = outcome.details.get("dimensions") {
            remember(&state, session, dims).await;
        }
    }

    tracing::info!(calculation_type = %outcome.calculation_type, "Calculation completed");
    Ok(DataResponse::with_message("Calculation completed", outcome))
}

/// POST /calculations/column-sizing
pub async fn column_sizing(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    AppJson(input): AppJson<ColumnSizingInput>,
) -> ApiResult<impl IntoResponse> {
    let session = session_id(&headers)?;
    let result = size_column(&input)?;

    if let Some(session) = session.as_deref() {
        remember(&state, session, &result.dimensions).await;
    }

    Ok(DataResponse::with_message("Column sized", result))
}

/// POST /calculations/footing-concrete
pub async fn footing_concrete(
    AppJson(input): AppJson<FootingInput>,
) -> ApiResult<impl IntoResponse> {
    Ok(DataResponse::new(footing_volume(&input)?))
}

/// POST /calculations/column-concrete
pub async fn column_concrete(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    AppJson(mut input): AppJson<ColumnConcreteInput>,
) -> ApiResult<impl IntoResponse> {
    let session = session_id(&headers)?;
    resolve_column_dimensions(&state, session.as_deref(), &mut input).await;
    Ok(DataResponse::new(column_volume(&input)?))
}

/// POST /calculations/foundation-concrete
pub async fn foundation_concrete(
    AppJson(input): AppJson<FoundationInput>,
) -> ApiResult<impl IntoResponse> {
    Ok(DataResponse::new(foundation_volume(&input)?))
}

/// POST /calculations/beam-quantities
pub async fn beam(AppJson(input): AppJson<BeamInput>) -> ApiResult<impl IntoResponse> {
    Ok(DataResponse::new(beam_quantities(&input)?))
}

/// POST /calculations/slab-quantities
pub async fn slab(AppJson(input): AppJson<SlabInput>) -> ApiResult<impl IntoResponse> {
    Ok(DataResponse::new(slab_quantities(&input)?))
}

/// POST /calculations/rib-slab-quantities
pub async fn rib_slab(AppJson(input): AppJson<RibSlabInput>) -> ApiResult<impl IntoResponse> {
    Ok(DataResponse::new(rib_slab_quantities(&input)?))
}

/// Fill a column's missing cross-section from the session's last sizing.
pub(crate) async fn resolve_column_dimensions(
    state: &AppState,
    session: Option<&str>,
    input: &mut ColumnConcreteInput,
) {
    if !input.needs_section() {
        return;
    }
    let Some(session) = session else {
        return;
    };

    match state
        .handoff
        .get::<ColumnDimensions>(&keys::column_dimensions(session))
        .await
    {
        Some(dims) => {
            if input.fill_from(&dims) {
                tracing::debug!(session = session, ?dims, "Using handed-off column dimensions");
            } else {
                tracing::debug!(
                    session = session,
                    requested = ?input.shape,
                    sized = ?dims.shape,
                    "Ignoring handed-off column dimensions of another shape"
                );
            }
        }
        None => tracing::debug!(session = session, "No column dimensions handed off"),
    }
}

/// Store column dimensions for later calculators. Failures are logged only.
async fn remember<T: Serialize>(state: &AppState, session: &str, dims: &T) {
    if let Err(e) = state
        .handoff
        .put(&keys::column_dimensions(session), dims)
        .await
    {
        tracing::warn!(session = session, error = %e, "Failed to hand off column dimensions");
    }
}
