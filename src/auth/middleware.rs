use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejectionReason,
    TypedHeader,
};

use crate::error::ErrorResponse;
use crate::middleware::{current_request_id, RequestIdExt};

/// Extractor for calls that are relayed to the backend API.
///
/// The bearer token is not verified here; the backend owns authentication
/// and answers 401/403 itself. This only makes sure a token is present so
/// anonymous calls fail fast.
///
/// Example:
/// ```ignore
/// async fn list(caller: Caller, State(state): State<Arc<AppState>>) -> impl IntoResponse {
///     state.backend.list_users(&caller).await
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Caller {
    token: String,
    request_id: Option<String>,
}

impl Caller {
    pub fn new(token: impl Into<String>, request_id: Option<String>) -> Self {
        Self {
            token: token.into(),
            request_id,
        }
    }

    /// Raw bearer token to forward
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidFormat,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match &self {
            AuthError::MissingToken => "Missing authorization token",
            AuthError::InvalidFormat => "Invalid authorization format",
        };

        let body = ErrorResponse {
            success: false,
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            request_id: current_request_id(),
        };

        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| match rejection.reason() {
                    TypedHeaderRejectionReason::Missing => AuthError::MissingToken,
                    _ => AuthError::InvalidFormat,
                })?;

        let token = bearer.token().trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        Ok(Caller::new(
            token,
            parts.headers.request_id().map(str::to_string),
        ))
    }
}
