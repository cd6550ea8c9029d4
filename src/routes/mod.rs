pub mod calculations;
pub mod engineering_data;
pub mod handoff;
pub mod health;
pub mod projects;
pub mod reports;
pub mod users;

use axum::{
    http::HeaderMap,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::handoff::keys;

/// Header naming the client's calculator session for hand-off values.
pub const X_SESSION_ID: &str = "x-session-id";

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Public routes
        .route("/health", get(health::health_check))
        // Calculators
        .route("/calculations", post(calculations::calculate))
        .route("/calculations/reference", get(calculations::reference))
        .route(
            "/calculations/column-sizing",
            post(calculations::column_sizing),
        )
        .route(
            "/calculations/footing-concrete",
            post(calculations::footing_concrete),
        )
        .route(
            "/calculations/column-concrete",
            post(calculations::column_concrete),
        )
        .route(
            "/calculations/foundation-concrete",
            post(calculations::foundation_concrete),
        )
        .route("/calculations/beam-quantities", post(calculations::beam))
        .route("/calculations/slab-quantities", post(calculations::slab))
        .route(
            "/calculations/rib-slab-quantities",
            post(calculations::rib_slab),
        )
        // Hand-off between calculators
        .route(
            "/handoff/:session_id/:name",
            get(handoff::get_entry)
                .put(handoff::put_entry)
                .delete(handoff::delete_entry),
        )
        // Quantity reports (backend)
        .route(
            "/quantity-reports",
            get(reports::list_reports).post(reports::create_report),
        )
        .route(
            "/quantity-reports/:report_id",
            get(reports::get_report).delete(reports::delete_report),
        )
        .route(
            "/quantity-reports/:report_id/send",
            post(reports::send_to_owner),
        )
        // Projects (backend)
        .route("/projects/:project_id", get(projects::get_project))
        // Users (backend, admin only)
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/:user_id", axum::routing::delete(users::delete_user))
        .route("/users/:user_id/status", patch(users::update_user_status))
        // Engineering reference data (backend)
        .route(
            "/engineering-data/*path",
            get(engineering_data::get_dataset),
        )
}

/// Read and validate the optional `x-session-id` header.
pub(crate) fn session_id(headers: &HeaderMap) -> Result<Option<String>, ApiError> {
    let Some(value) = headers.get(X_SESSION_ID) else {
        return Ok(None);
    };
    let session = value
        .to_str()
        .ok()
        .map(str::trim)
        .filter(|s| keys::is_valid_segment(s))
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid {X_SESSION_ID} header")))?;
    Ok(Some(session.to_string()))
}
