//! Analysis record domain model
//!
//! `AnalysisRecord` is the persisted outcome of one upload-and-classify
//! cycle. All state transitions live here as consuming methods so the
//! lifecycle (`processing -> completed | error`, terminal either way) is
//! enforced in one place rather than scattered across handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

use crate::classifier::ClassificationResult;
use crate::errors::AppError;

pub const MAX_TITLE_CHARS: usize = 500;
pub const MAX_EVIDENCE_CHARS: usize = 1000;
pub const MAX_KEYWORD_CHARS: usize = 50;
pub const MAX_ERROR_MESSAGE_CHARS: usize = 500;

/// Raised when an API parameter names an unknown enum value
#[derive(Debug)]
pub struct InvalidEnumValue {
    pub field: &'static str,
    pub value: String,
    pub allowed: &'static str,
}

impl From<InvalidEnumValue> for AppError {
    fn from(err: InvalidEnumValue) -> Self {
        AppError::validation_field(
            format!(
                "Invalid {}: '{}' (expected one of: {})",
                err.field, err.value, err.allowed
            ),
            err.field,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DocumentType {
    #[default]
    Conference,
    Journal,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::Conference => write!(f, "Conference"),
            DocumentType::Journal => write!(f, "Journal"),
        }
    }
}

impl FromStr for DocumentType {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Conference" => Ok(DocumentType::Conference),
            "Journal" => Ok(DocumentType::Journal),
            other => Err(InvalidEnumValue {
                field: "type",
                value: other.to_string(),
                allowed: "Conference, Journal",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperNature {
    #[default]
    Implementation,
    Theoretical,
}

impl fmt::Display for PaperNature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaperNature::Implementation => write!(f, "Implementation"),
            PaperNature::Theoretical => write!(f, "Theoretical"),
        }
    }
}

impl FromStr for PaperNature {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Implementation" => Ok(PaperNature::Implementation),
            "Theoretical" => Ok(PaperNature::Theoretical),
            other => Err(InvalidEnumValue {
                field: "nature",
                value: other.to_string(),
                allowed: "Implementation, Theoretical",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    #[default]
    Processing,
    Completed,
    Error,
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisStatus::Processing => write!(f, "processing"),
            AnalysisStatus::Completed => write!(f, "completed"),
            AnalysisStatus::Error => write!(f, "error"),
        }
    }
}

impl FromStr for AnalysisStatus {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(AnalysisStatus::Processing),
            "completed" => Ok(AnalysisStatus::Completed),
            "error" => Ok(AnalysisStatus::Error),
            other => Err(InvalidEnumValue {
                field: "status",
                value: other.to_string(),
                allowed: "processing, completed, error",
            }),
        }
    }
}

/// The central entity: one record per submitted document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub title: String,
    pub original_file_name: String,
    pub upload_timestamp: DateTime<Utc>,
    pub document_type: DocumentType,
    pub type_confidence: f64,
    pub nature: PaperNature,
    pub nature_confidence: f64,
    pub evidence: Vec<String>,
    pub keywords: Vec<String>,
    pub processing_time_ms: u64,
    pub file_size_bytes: u64,
    pub status: AnalysisStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub owner_id: String,
}

impl AnalysisRecord {
    /// Fresh record at upload start. Classification fields hold neutral
    /// placeholders until the pipeline resolves.
    pub fn processing(title: String, original_file_name: String, file_size_bytes: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: truncate_chars(title, MAX_TITLE_CHARS),
            original_file_name,
            upload_timestamp: Utc::now(),
            document_type: DocumentType::default(),
            type_confidence: 0.0,
            nature: PaperNature::default(),
            nature_confidence: 0.0,
            evidence: Vec::new(),
            keywords: Vec::new(),
            processing_time_ms: 0,
            file_size_bytes,
            status: AnalysisStatus::Processing,
            error_message: None,
            owner_id: "anonymous".to_string(),
        }
    }

    /// Merge a classification outcome and move to the terminal
    /// `completed` state. Confidences are clamped into [0, 1] and
    /// oversized strings truncated; a degraded classifier must not be
    /// able to produce an invalid record.
    pub fn complete(mut self, outcome: ClassificationResult, elapsed: Duration) -> Self {
        if let Some(title) = outcome.title {
            self.title = truncate_chars(title, MAX_TITLE_CHARS);
        }
        self.document_type = outcome.document_type;
        self.type_confidence = outcome.type_confidence.clamp(0.0, 1.0);
        self.nature = outcome.nature;
        self.nature_confidence = outcome.nature_confidence.clamp(0.0, 1.0);
        self.evidence = outcome
            .evidence
            .into_iter()
            .map(|e| truncate_chars(e, MAX_EVIDENCE_CHARS))
            .collect();
        self.keywords = outcome
            .keywords
            .into_iter()
            .map(|k| truncate_chars(k, MAX_KEYWORD_CHARS))
            .collect();
        self.status = AnalysisStatus::Completed;
        self.error_message = None;
        self.processing_time_ms = elapsed.as_millis() as u64;
        self
    }

    /// Move to the terminal `error` state with a diagnostic message
    pub fn fail(mut self, message: &str) -> Self {
        self.status = AnalysisStatus::Error;
        self.error_message = Some(truncate_chars(message.to_string(), MAX_ERROR_MESSAGE_CHARS));
        self
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            AnalysisStatus::Completed | AnalysisStatus::Error
        )
    }
}

/// Aggregate statistics over the completed population
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
    pub total_analyses: u64,
    pub conference_count: u64,
    pub journal_count: u64,
    pub implementation_count: u64,
    pub theoretical_count: u64,
    pub avg_type_confidence: f64,
    pub avg_nature_confidence: f64,
}

fn truncate_chars(s: String, max: usize) -> String {
    if s.chars().count() <= max {
        s
    } else {
        s.chars().take(max).collect()
    }
}
