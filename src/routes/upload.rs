//! Upload handler

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use crate::classifier::UploadedFile;
use crate::db::models::AnalysisRecord;
use crate::errors::{AppError, Result};
use crate::services::AppState;

#[derive(Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: AnalysisRecord,
}

/// POST /upload: multipart body with a single file field
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Malformed multipart body: {e}")))?
    {
        let Some(name) = field.file_name().map(|n| n.to_string()) else {
            // Not a file field; ignore
            continue;
        };
        let mime_type = field
            .content_type()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Failed to read uploaded file: {e}")))?
            .to_vec();

        file = Some(UploadedFile {
            size_bytes: bytes.len() as u64,
            name,
            mime_type,
            bytes,
        });
        break;
    }

    let file = file.ok_or_else(|| {
        AppError::validation_field("Please select a PDF file to upload", "file")
    })?;

    let record = state.upload_service.submit(file).await?;

    Ok(Json(UploadResponse {
        success: true,
        message: "PDF analyzed successfully",
        data: record,
    }))
}
