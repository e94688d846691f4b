//! Report download handler

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use metrics::counter;

use super::parse_id;
use crate::errors::{AppError, Result};
use crate::services::AppState;

/// GET /report/{id}: rendered report as a downloadable attachment
pub async fn download_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = parse_id(&id)?;
    let record = state
        .store
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Analysis", id))?;

    let artifact = state.report_exporter.render(&record)?;
    counter!("paperinsight_reports_total").increment(1);

    let headers = [
        (header::CONTENT_TYPE, artifact.content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", artifact.file_name),
        ),
    ];
    Ok((headers, artifact.bytes).into_response())
}
