use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::api::DataResponse;
use crate::app::AppState;
use crate::auth::Caller;
use crate::error::ApiResult;

/// GET /projects/:project_id
pub async fn get_project(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    tracing::info!(project_id = %project_id, "Getting project");

    let project = state.backend.get_project(&caller, &project_id).await?;
    Ok(DataResponse::new(project))
}
