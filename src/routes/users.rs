//! User administration routes
//!
//! Relayed to the backend, which enforces that the caller is an ADMIN.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::{AppJson, Created, DataResponse, MessageResponse, Paginated, PaginationParams};
use crate::app::AppState;
use crate::auth::Caller;
use crate::domain::{CreateUserRequest, UpdateUserStatusRequest, UserRole, UserStatus};
use crate::error::{ApiError, ApiResult};

/// Query params for the user list
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UserFilter {
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub status: Option<UserStatus>,
    /// Case-insensitive match on name or email
    #[serde(default)]
    pub search: Option<String>,
}

/// GET /users
pub async fn list_users(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Query(filter): Query<UserFilter>,
    Query(pagination): Query<PaginationParams>,
) -> ApiResult<impl IntoResponse> {
    let search = filter
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let users: Vec<_> = state
        .backend
        .list_users(&caller)
        .await?
        .into_iter()
        .filter(|u| filter.role.map_or(true, |role| u.role == role))
        .filter(|u| match filter.status {
            Some(status) => u.status == status,
            // Deleted accounts stay hidden unless asked for.
            None => u.status != UserStatus::Deleted,
        })
        .filter(|u| {
            search.as_deref().map_or(true, |q| {
                u.name.to_lowercase().contains(q) || u.email.to_lowercase().contains(q)
            })
        })
        .collect();

    tracing::info!(count = users.len(), page = pagination.page(), "Listing users");
    Ok(Paginated::from_all(users, &pagination))
}

/// POST /users
pub async fn create_user(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let req = req.normalized().map_err(ApiError::BadRequest)?;
    let user = state.backend.create_user(&caller, &req).await?;

    tracing::info!(user_id = %user.id, role = ?user.role, "User created");
    Ok(Created(DataResponse::with_message("User created", user)))
}

/// PATCH /users/:user_id/status
pub async fn update_user_status(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    AppJson(req): AppJson<UpdateUserStatusRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .backend
        .update_user_status(&caller, &user_id, req.status)
        .await?;

    tracing::info!(user_id = %user.id, status = ?user.status, "User status updated");
    Ok(DataResponse::with_message("User status updated", user))
}

/// DELETE /users/:user_id
pub async fn delete_user(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.backend.delete_user(&caller, &user_id).await?;

    tracing::info!(user_id = %user_id, "User deleted");
    Ok(MessageResponse::new("User deleted"))
}
