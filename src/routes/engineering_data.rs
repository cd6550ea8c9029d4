use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::api::DataResponse;
use crate::app::AppState;
use crate::auth::Caller;
use crate::error::{ApiError, ApiResult};
use crate::services::handoff::keys::is_valid_segment;

/// Deepest dataset path forwarded to the backend.
const MAX_DEPTH: usize = 8;

/// Split a dataset path such as `loads/live/residential` into checked segments.
fn dataset_segments(path: &str) -> ApiResult<Vec<&str>> {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    if segments.len() > MAX_DEPTH || !segments.iter().all(|s| is_valid_segment(s)) {
        return Err(ApiError::BadRequest(format!("Invalid dataset path: {path}")));
    }
    Ok(segments)
}

/// GET /engineering-data/*path
///
/// Reference datasets are served by the backend as-is, at any depth.
pub async fn get_dataset(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let segments = dataset_segments(&path)?;
    let data = state.backend.get_engineering_data(&caller, &segments).await?;
    Ok(DataResponse::new(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_paths_keep_every_segment() {
        assert_eq!(dataset_segments("bars").unwrap(), vec!["bars"]);
        assert_eq!(
            dataset_segments("/loads/live/residential").unwrap(),
            vec!["loads", "live", "residential"]
        );
    }

    #[test]
    fn traversal_and_empty_segments_are_rejected() {
        assert!(dataset_segments("loads/../users").is_err());
        assert!(dataset_segments("loads//live").is_err());
        assert!(dataset_segments("").is_err());
        assert!(dataset_segments(&["a"; MAX_DEPTH + 1].join("/")).is_err());
    }
}
