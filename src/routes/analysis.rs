//! Analysis listing and management handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::parse_id;
use crate::db::models::{AnalysisRecord, AnalysisStats, AnalysisStatus};
use crate::db::AnalysisFilter;
use crate::errors::{AppError, Result};
use crate::services::query::{ListPage, DEFAULT_PAGE_SIZE};
use crate::services::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    pub nature: Option<String>,
    pub search: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

#[derive(Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub data: Vec<AnalysisRecord>,
    pub pagination: Pagination,
    pub statistics: AnalysisStats,
}

impl From<ListPage> for ListResponse {
    fn from(page: ListPage) -> Self {
        ListResponse {
            success: true,
            data: page.items,
            pagination: Pagination {
                page: page.page,
                limit: page.limit,
                total: page.total,
                pages: page.pages,
            },
            statistics: page.statistics,
        }
    }
}

#[derive(Serialize)]
pub struct SingleResponse {
    pub success: bool,
    pub data: AnalysisRecord,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BatchDeleteRequest {
    #[validate(length(min = 1, message = "IDs array is required"))]
    pub ids: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeleteResponse {
    pub success: bool,
    pub message: String,
    pub deleted_count: u64,
}

/// GET /analysis: filtered, paginated listing with statistics
pub async fn list_analyses(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>> {
    let filter = build_filter(&query)?;
    let page = state
        .query_service
        .list(
            filter,
            query.page.unwrap_or(1),
            query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;
    Ok(Json(page.into()))
}

/// GET /analysis/{id}
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SingleResponse>> {
    let id = parse_id(&id)?;
    let record = state
        .store
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Analysis", id))?;

    Ok(Json(SingleResponse {
        success: true,
        data: record,
    }))
}

/// DELETE /analysis/{id}
pub async fn delete_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let id = parse_id(&id)?;
    let deleted = state.store.delete_by_id(id).await?;
    if !deleted {
        return Err(AppError::not_found("Analysis", id));
    }

    tracing::info!(analysis_id = %id, "analysis deleted");
    Ok(Json(DeleteResponse {
        success: true,
        message: "Analysis deleted successfully".to_string(),
    }))
}

/// POST /analysis/batch-delete
///
/// The payload is decoded by hand so malformed bodies surface as a
/// structured ValidationError instead of a bare rejection.
pub async fn batch_delete(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<BatchDeleteResponse>> {
    let request: BatchDeleteRequest = serde_json::from_value(payload)
        .map_err(|e| AppError::validation_field(format!("Invalid payload: {e}"), "ids"))?;
    request
        .validate()
        .map_err(|e| AppError::validation_field(e.to_string(), "ids"))?;

    let ids = request
        .ids
        .iter()
        .map(|raw| {
            raw.parse::<Uuid>().map_err(|_| {
                AppError::validation_field(format!("Invalid analysis id: {raw}"), "ids")
            })
        })
        .collect::<Result<Vec<Uuid>>>()?;

    let deleted_count = state.store.delete_many(&ids).await?;

    tracing::info!(requested = ids.len(), deleted = deleted_count, "batch delete");
    Ok(Json(BatchDeleteResponse {
        success: true,
        message: format!("{deleted_count} analyses deleted successfully"),
        deleted_count,
    }))
}

fn build_filter(query: &ListQuery) -> Result<AnalysisFilter> {
    let status = match &query.status {
        Some(raw) => raw.parse::<AnalysisStatus>()?,
        // Listings only surface finished work by default; in-flight and
        // errored records stay hidden unless asked for
        None => AnalysisStatus::Completed,
    };

    let mut filter = AnalysisFilter {
        status: Some(status),
        ..AnalysisFilter::default()
    };
    if let Some(raw) = &query.doc_type {
        filter.document_type = Some(raw.parse()?);
    }
    if let Some(raw) = &query.nature {
        filter.nature = Some(raw.parse()?);
    }
    filter.title_contains = query.search.clone().filter(|s| !s.trim().is_empty());
    filter.uploaded_from = parse_date(query.date_from.as_deref(), "dateFrom", false)?;
    filter.uploaded_to = parse_date(query.date_to.as_deref(), "dateTo", true)?;
    Ok(filter)
}

/// Accepts RFC 3339 timestamps or bare dates. A bare `dateTo` widens to
/// end-of-day so whole-day ranges are inclusive.
fn parse_date(
    value: Option<&str>,
    field: &'static str,
    end_of_day: bool,
) -> Result<Option<DateTime<Utc>>> {
    let Some(raw) = value else {
        return Ok(None);
    };
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(timestamp.with_timezone(&Utc)));
    }
    if let Ok(date) = raw.parse::<NaiveDate>() {
        let time = if end_of_day {
            date.and_hms_milli_opt(23, 59, 59, 999)
        } else {
            date.and_hms_opt(0, 0, 0)
        }
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN));
        return Ok(Some(DateTime::from_naive_utc_and_offset(time, Utc)));
    }
    Err(AppError::validation_field(
        format!("{field} must be an RFC 3339 timestamp or YYYY-MM-DD date"),
        field,
    ))
}
