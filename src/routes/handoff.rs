//! Hand-off routes
//!
//! Lets the front end park a JSON value for a session and read it back on
//! another page, in place of browser-local storage.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::api::{AppJson, DataResponse, MessageResponse};
use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::services::handoff::keys;

fn entry_key(session_id: &str, name: &str) -> Result<String, ApiError> {
    if !keys::is_valid_segment(session_id) || !keys::is_valid_segment(name) {
        return Err(ApiError::BadRequest(
            "Session id and key must be 1-64 characters of letters, digits, '-' or '_'"
                .to_string(),
        ));
    }
    Ok(keys::entry(session_id, name))
}

/// GET /handoff/:session_id/:name
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path((session_id, name)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let key = entry_key(&session_id, &name)?;
    let value: serde_json::Value = state
        .handoff
        .get(&key)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("No value stored under '{name}'")))?;
    Ok(DataResponse::new(value))
}

/// PUT /handoff/:session_id/:name
pub async fn put_entry(
    State(state): State<Arc<AppState>>,
    Path((session_id, name)): Path<(String, String)>,
    AppJson(value): AppJson<serde_json::Value>,
) -> ApiResult<impl IntoResponse> {
    let key = entry_key(&session_id, &name)?;
    state.handoff.put(&key, &value).await?;
    Ok(DataResponse::with_message("Stored", value))
}

/// DELETE /handoff/:session_id/:name
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path((session_id, name)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let key = entry_key(&session_id, &name)?;
    if state.handoff.delete(&key).await? {
        Ok(MessageResponse::new("Removed"))
    } else {
        Err(ApiError::NotFound(format!("No value stored under '{name}'")))
    }
}
