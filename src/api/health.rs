/// Health, version and metrics publishing
///
/// Served on the main port, or on the monitoring port when one is configured.
/// The mock has no external dependency, so it is healthy whenever it can answer.

use crate::{context::AppContext, metrics};
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Serialize;

/// Detailed health response
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: f64,
    pub persons: usize,
    pub identities: usize,
    pub timestamp: String,
}

/// Build monitoring routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/health", get(health_basic))
        .route("/health/live", get(liveness_probe))
        .route("/health/ready", get(readiness_probe))
        .route("/health/detailed", get(health_detailed))
        .route("/version", get(version))
        .route("/metrics", get(metrics_endpoint))
}

/// Basic health check
pub async fn health_basic() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Liveness probe
pub async fn liveness_probe() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe
pub async fn readiness_probe() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ready",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Health with registry counts and uptime
pub async fn health_detailed(State(ctx): State<AppContext>) -> Json<HealthStatus> {
    let (persons, identities) = ctx.repository.counts().await;

    Json(HealthStatus {
        status: "healthy".to_string(),
        version: ctx.config.service.version.clone(),
        uptime_seconds: metrics::uptime_seconds(),
        persons,
        identities,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Service name and version
pub async fn version(State(ctx): State<AppContext>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "pr",
        "version": ctx.config.service.version
    }))
}

/// Prometheus text exposition
pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::render_metrics(),
    )
}
