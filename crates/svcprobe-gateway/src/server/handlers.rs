//! HTTP handlers for the status API

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Redirect, Response},
};
use serde::Serialize;
use svcprobe_core::{CheckError, ServiceStatus};
use tracing::{debug, info, warn};

use crate::services::StatusService;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Body returned when a check fails with an error
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "errorMessage")]
    pub error_message: String,
}

/// Maps check errors onto HTTP responses.
pub struct ApiError(CheckError);

impl From<CheckError> for ApiError {
    fn from(err: CheckError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            CheckError::ServiceNotFound(_) => StatusCode::NOT_FOUND,
            CheckError::Token(_) | CheckError::HealthCheck(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!("[Gateway] {}: {}", self.0.kind(), self.0);

        let body = ErrorResponse {
            error_message: format!("{}: {}", self.0.kind(), self.0),
        };
        (status, Json(body)).into_response()
    }
}

/// Path of the bundled status dashboard
pub const DASHBOARD_PATH: &str = "/dashboard.html";

const DASHBOARD_HTML: &str = include_str!("../../assets/dashboard.html");

/// `GET /` - redirect to the dashboard
pub async fn root() -> Redirect {
    Redirect::to(DASHBOARD_PATH)
}

/// Static dashboard listing `/all` with a reload button
pub async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    debug!("[Gateway] Health check");
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /status/{name}` - 200 when the service is ok, 500 otherwise
pub async fn status(
    State(service): State<Arc<StatusService>>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let status = service.check(&name).await?;

    let code = if status.is_ok() {
        info!(service = %name, "[Gateway] Successful health check");
        StatusCode::OK
    } else {
        warn!(
            service = %name,
            "[Gateway] Failed health check result: {}",
            status.message
        );
        StatusCode::INTERNAL_SERVER_ERROR
    };

    Ok((code, Json(status)).into_response())
}

/// `GET /all` - status of every configured service
pub async fn all(
    State(service): State<Arc<StatusService>>,
) -> Result<Json<Vec<ServiceStatus>>, ApiError> {
    Ok(Json(service.check_all().await?))
}

/// `GET /reload` - re-read the services file and drop cached connections
pub async fn reload(State(service): State<Arc<StatusService>>) -> &'static str {
    service.reload();
    "ok"
}
