use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    routing::get,
};
use deployment::Deployment;
use serde_json::json;

use crate::DeploymentImpl;

/// The process is up. Touches no dependency.
pub async fn liveness() -> impl IntoResponse {
    ResponseJson(json!({ "status": "ok" }))
}

pub async fn readiness(State(deployment): State<DeploymentImpl>) -> impl IntoResponse {
    let report = deployment.health().readiness(deployment.db()).await;
    let status = if report.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, ResponseJson(report))
}

pub fn router() -> Router<DeploymentImpl> {
    Router::new()
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
}
