//! HTTP surface
//!
//! Router assembly plus the middleware stack: tracing, CORS, request-id
//! propagation, request timeout, and a body limit sized above the upload
//! cap so oversized files are rejected by validation, not the framework.

pub mod analysis;
pub mod health;
pub mod report;
pub mod upload;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::services::AppState;

/// Multipart framing overhead allowed on top of the file itself
const BODY_LIMIT_SLACK: usize = 64 * 1024;

/// Maximum concurrent requests (backpressure control)
const MAX_CONCURRENT_REQUESTS: usize = 100;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config.upload.max_file_size_bytes as usize + BODY_LIMIT_SLACK;
    let request_timeout = state.config.request_timeout();

    Router::new()
        .route("/upload", post(upload::upload_file))
        .route("/analysis", get(analysis::list_analyses))
        .route("/analysis/batch-delete", post(analysis::batch_delete))
        .route("/analysis/{id}", get(analysis::get_analysis))
        .route("/analysis/{id}", delete(analysis::delete_analysis))
        .route("/report/{id}", get(report::download_report))
        .route("/health", get(health::health_check))
        .route("/readiness", get(health::readiness_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Path-segment ids are validated explicitly so a malformed id yields a
/// structured 400 rather than a 404
pub(crate) fn parse_id(raw: &str) -> Result<Uuid> {
    raw.parse()
        .map_err(|_| AppError::validation_field(format!("Invalid analysis id: {raw}"), "id"))
}
