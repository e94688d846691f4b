//! Metrics and observability utilities
//!
//! Prometheus metrics via the `metrics` facade. Recording sites live in
//! the service layer; the recorder is installed once at startup and the
//! handle rendered at `/metrics`.

use axum::routing::get;
use axum::Router;
use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        "paperinsight_uploads_total",
        Unit::Count,
        "Uploads that reached a terminal record state, by result"
    );
    describe_counter!(
        "paperinsight_classifications_total",
        Unit::Count,
        "Classification outcomes by origin (service or fallback)"
    );
    describe_histogram!(
        "paperinsight_upload_duration_seconds",
        Unit::Seconds,
        "End-to-end upload pipeline latency"
    );
    describe_counter!(
        "paperinsight_list_queries_total",
        Unit::Count,
        "Analysis listing queries served"
    );
    describe_counter!(
        "paperinsight_reports_total",
        Unit::Count,
        "Report artifacts rendered"
    );

    tracing::info!("Metrics registered");
}

/// Install the global Prometheus recorder. Call once per process.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Router exposing the rendered metrics
pub fn metrics_router(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}
