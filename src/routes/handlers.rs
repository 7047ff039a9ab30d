//! Request handlers for the Amber endpoints

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::instrument;

use crate::api::{HealthStatus, Readme, ServiceInfo};
use crate::errors::{AmberError, Result};
use crate::metrics::{Metrics, CONTENT_TYPE};

/// Service metadata - GET /
#[instrument]
pub async fn index() -> Json<ServiceInfo> {
    Json(ServiceInfo::amber())
}

/// Liveness probe - GET /health
#[instrument]
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthStatus::ok()))
}

/// Service description - GET /readme
#[instrument]
pub async fn readme() -> Json<Readme> {
    Json(Readme::amber())
}

/// Always fails, to exercise the error path and downstream alerting - GET /error
#[instrument]
pub async fn error() -> Result<()> {
    Err(AmberError::Runtime("Intentional error for testing".to_string()))
}

/// Prometheus metrics endpoint - GET /metrics
#[instrument(skip_all)]
pub async fn metrics(State(metrics): State<Arc<Metrics>>) -> Result<Response> {
    let body = metrics.render()?;
    Ok(([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response())
}
