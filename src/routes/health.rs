//! Health check endpoints for liveness and readiness probes
//!
//! - `/health` - liveness; returns OK whenever the process is up
//! - `/readiness` - verifies store connectivity

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::services::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub store: CheckResult,
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub status: &'static str,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: crate::VERSION,
    })
}

pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = std::time::Instant::now();

    let store_check = match state.store.ping().await {
        Ok(()) => CheckResult {
            status: "healthy",
            latency_ms: start.elapsed().as_millis() as u64,
            error: None,
        },
        Err(err) => CheckResult {
            status: "unhealthy",
            latency_ms: start.elapsed().as_millis() as u64,
            error: Some(err.to_string()),
        },
    };

    let ready = store_check.status == "healthy";
    let response = ReadinessResponse {
        status: if ready { "ready" } else { "not_ready" },
        version: crate::VERSION,
        checks: HealthChecks { store: store_check },
    };

    if ready {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}
