//! Client for the backend REST API.
//!
//! The backend owns users, projects, quantity reports and engineering
//! reference data. Every response is a `{success, message, data}` envelope;
//! this client unwraps it and maps failures onto [`ApiError`].

use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument};
use url::Url;

use crate::auth::Caller;
use crate::domain::{
    CreateUserRequest, NewQuantityReport, Project, QuantityReport, ReportFilter, User, UserStatus,
};
use crate::error::ApiError;
use crate::middleware::X_REQUEST_ID;

/// Client for the backend API.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
}

/// Envelope used by every backend endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default = "default_success")]
    success: bool,
    message: Option<String>,
    data: Option<T>,
}

fn default_success() -> bool {
    true
}

impl BackendClient {
    /// Create a new backend API client.
    pub fn new(base_url: &Url, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        tracing::info!(base_url = %base_url, "Backend client initialized");

        Ok(Self {
            client,
            base_url: base_url.clone(),
        })
    }

    /// Build an endpoint URL from path segments; each segment is percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::internal("Backend URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, caller: &Caller) -> RequestBuilder {
        let mut req = self
            .client
            .request(method, url)
            .bearer_auth(caller.token())
            .header("Accept", "application/json");

        if let Some(rid) = caller.request_id() {
            req = req.header(X_REQUEST_ID, rid);
        }
        req
    }

    /// Send a request and unwrap the response envelope.
    async fn send<R: DeserializeOwned>(&self, req: RequestBuilder) -> Result<R, ApiError> {
        let response = req.send().await.map_err(|e| {
            error!(error = %e, "Backend request failed");
            ApiError::Upstream(format!("Backend unavailable: {}", e))
        })?;

        let status = response.status();
        debug!(status = %status, url = %response.url(), "Backend response");

        if status.is_success() {
            let envelope = response.json::<Envelope<R>>().await.map_err(|e| {
                error!(error = %e, "Failed to parse backend response");
                ApiError::Upstream(format!("Invalid backend response: {}", e))
            })?;

            if !envelope.success {
                return Err(ApiError::BadRequest(
                    envelope
                        .message
                        .unwrap_or_else(|| "Request rejected by backend".to_string()),
                ));
            }

            match envelope.data {
                Some(data) => Ok(data),
                // Endpoints without a payload (deletes) decode into `()` or `Option<_>`.
                None => serde_json::from_value(serde_json::Value::Null).map_err(|_| {
                    ApiError::Upstream("Backend response is missing data".to_string())
                }),
            }
        } else {
            let message = response
                .json::<Envelope<serde_json::Value>>()
                .await
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("Backend error: {}", status));

            Err(map_status(status, message))
        }
    }

    /// Check backend health.
    pub async fn health_check(&self) -> Result<()> {
        let url = self.url(&["health"]).map_err(|e| anyhow::anyhow!(e.to_string()))?;

        self.client
            .get(url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .context("Backend health check failed")?
            .error_for_status()
            .context("Backend unhealthy")?;

        Ok(())
    }

    // =========================================================================
    // Users
    // =========================================================================

    #[instrument(skip(self, caller))]
    pub async fn list_users(&self, caller: &Caller) -> Result<Vec<User>, ApiError> {
        let url = self.url(&["users"])?;
        self.send(self.request(Method::GET, url, caller)).await
    }

    #[instrument(skip(self, caller, body), fields(email = %body.email))]
    pub async fn create_user(
        &self,
        caller: &Caller,
        body: &CreateUserRequest,
    ) -> Result<User, ApiError> {
        let url = self.url(&["users"])?;
        self.send(self.request(Method::POST, url, caller).json(body))
            .await
    }

    #[instrument(skip(self, caller))]
    pub async fn update_user_status(
        &self,
        caller: &Caller,
        user_id: &str,
        status: UserStatus,
    ) -> Result<User, ApiError> {
        #[derive(Serialize)]
        struct Request {
            status: UserStatus,
        }

        let url = self.url(&["users", user_id, "status"])?;
        self.send(
            self.request(Method::PATCH, url, caller)
                .json(&Request { status }),
        )
        .await
    }

    #[instrument(skip(self, caller))]
    pub async fn delete_user(&self, caller: &Caller, user_id: &str) -> Result<(), ApiError> {
        let url = self.url(&["users", user_id])?;
        let _: Option<serde_json::Value> =
            self.send(self.request(Method::DELETE, url, caller)).await?;
        Ok(())
    }

    // =========================================================================
    // Projects
    // =========================================================================

    #[instrument(skip(self, caller))]
    pub async fn get_project(&self, caller: &Caller, project_id: &str) -> Result<Project, ApiError> {
        let url = self.url(&["projects", project_id])?;
        self.send(self.request(Method::GET, url, caller)).await
    }

    // =========================================================================
    // Quantity reports
    // =========================================================================

    #[instrument(skip(self, caller))]
    pub async fn list_quantity_reports(
        &self,
        caller: &Caller,
        filter: &ReportFilter,
    ) -> Result<Vec<QuantityReport>, ApiError> {
        let url = self.url(&["quantity-reports"])?;
        self.send(self.request(Method::GET, url, caller).query(filter))
            .await
    }

    #[instrument(skip(self, caller))]
    pub async fn get_quantity_report(
        &self,
        caller: &Caller,
        report_id: &str,
    ) -> Result<QuantityReport, ApiError> {
        let url = self.url(&["quantity-reports", report_id])?;
        self.send(self.request(Method::GET, url, caller)).await
    }

    #[instrument(skip(self, caller, report), fields(project_id = %report.project_id, calculation_type = %report.calculation_type))]
    pub async fn create_quantity_report(
        &self,
        caller: &Caller,
        report: &NewQuantityReport,
    ) -> Result<QuantityReport, ApiError> {
        let url = self.url(&["quantity-reports"])?;
        self.send(self.request(Method::POST, url, caller).json(report))
            .await
    }

    /// Flag a report as sent to the project owner.
    #[instrument(skip(self, caller))]
    pub async fn send_report_to_owner(
        &self,
        caller: &Caller,
        report_id: &str,
    ) -> Result<QuantityReport, ApiError> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Request {
            sent_to_owner: bool,
        }

        let url = self.url(&["quantity-reports", report_id])?;
        self.send(
            self.request(Method::PATCH, url, caller)
                .json(&Request {
                    sent_to_owner: true,
                }),
        )
        .await
    }

    #[instrument(skip(self, caller))]
    pub async fn delete_quantity_report(
        &self,
        caller: &Caller,
        report_id: &str,
    ) -> Result<(), ApiError> {
        let url = self.url(&["quantity-reports", report_id])?;
        let _: Option<serde_json::Value> =
            self.send(self.request(Method::DELETE, url, caller)).await?;
        Ok(())
    }

    // =========================================================================
    // Engineering reference data
    // =========================================================================

    /// Fetch a reference dataset (load tables, material properties, ...) verbatim.
    ///
    /// `path` is the dataset's segments below `/engineering-data`.
    #[instrument(skip(self, caller))]
    pub async fn get_engineering_data(
        &self,
        caller: &Caller,
        path: &[&str],
    ) -> Result<serde_json::Value, ApiError> {
        let mut segments = Vec::with_capacity(path.len() + 1);
        segments.push("engineering-data");
        segments.extend_from_slice(path);
        let url = self.url(&segments)?;
        self.send(self.request(Method::GET, url, caller)).await
    }
}

fn map_status(status: StatusCode, message: String) -> ApiError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ApiError::BadRequest(message),
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
        StatusCode::FORBIDDEN => ApiError::Forbidden(message),
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        StatusCode::CONFLICT => ApiError::Conflict(message),
        _ => {
            error!(status = %status, message = %message, "Backend error");
            ApiError::Upstream(message)
        }
    }
}
