//! Error types for PaperInsight
//!
//! Distinct error types for the failure modes of the pipeline, with HTTP
//! status mapping and structured `{error, message}` responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Rejected before any record is created or touched
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// Timeout, transport error, or malformed payload from the external
    /// classification service. Recovered by the fallback path inside the
    /// upload pipeline; never surfaced by an upload.
    #[error("Classification service unavailable: {0}")]
    ClassifierUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            field: None,
        }
    }

    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn not_found(resource: &'static str, id: impl std::fmt::Display) -> Self {
        AppError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal {
            message: message.into(),
        }
    }

    /// Short label used as the `error` field of responses
    pub fn label(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "Validation failed",
            AppError::NotFound { .. } => "Not found",
            AppError::ClassifierUnavailable(_) => "Classification service unavailable",
            AppError::Database(_) => "Database error",
            AppError::Config(_) => "Configuration error",
            AppError::Serialization(_) => "Serialization error",
            AppError::Internal { .. } => "Internal server error",
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::ClassifierUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_)
            | AppError::Config(_)
            | AppError::Serialization(_)
            | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Structured error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if self.is_server_error() {
            tracing::error!(error = %message, status = status.as_u16(), "Server error");
        } else if self.is_client_error() {
            tracing::warn!(error = %message, status = status.as_u16(), "Client error");
        }

        let details = match &self {
            AppError::Validation {
                field: Some(field), ..
            } => Some(json!({ "field": field })),
            _ => None,
        };

        let body = ErrorBody {
            error: self.label(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}
