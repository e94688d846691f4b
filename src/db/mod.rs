//! Persistence layer
//!
//! `AnalysisStore` is the seam between the pipeline and storage. The
//! production implementation is [`PgStore`] (SeaORM over Postgres); the
//! in-process [`MemoryStore`] backs development mode and the test suite.

pub mod entity;
pub mod memory;
pub mod models;
pub mod repository;

pub use memory::MemoryStore;
pub use repository::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::Result;
use models::{AnalysisRecord, AnalysisStats, AnalysisStatus, DocumentType, PaperNature};

/// Listing filter; all fields optional and AND-combined
#[derive(Debug, Clone, Default)]
pub struct AnalysisFilter {
    pub status: Option<AnalysisStatus>,
    pub document_type: Option<DocumentType>,
    pub nature: Option<PaperNature>,
    /// Case-insensitive substring match on the title
    pub title_contains: Option<String>,
    pub uploaded_from: Option<DateTime<Utc>>,
    pub uploaded_to: Option<DateTime<Utc>>,
}

impl AnalysisFilter {
    pub fn completed() -> Self {
        Self {
            status: Some(AnalysisStatus::Completed),
            ..Self::default()
        }
    }

    /// In-memory predicate; shared by `MemoryStore` and kept equivalent to
    /// the SQL conditions built by `PgStore`
    pub fn matches(&self, record: &AnalysisRecord) -> bool {
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        if let Some(document_type) = self.document_type {
            if record.document_type != document_type {
                return false;
            }
        }
        if let Some(nature) = self.nature {
            if record.nature != nature {
                return false;
            }
        }
        if let Some(term) = &self.title_contains {
            if !record
                .title
                .to_lowercase()
                .contains(&term.to_lowercase())
            {
                return false;
            }
        }
        if let Some(from) = self.uploaded_from {
            if record.upload_timestamp < from {
                return false;
            }
        }
        if let Some(to) = self.uploaded_to {
            if record.upload_timestamp > to {
                return false;
            }
        }
        true
    }
}

/// Storage contract for analysis records. All operations are atomic at
/// single-record granularity; no multi-record transaction is required.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn create(&self, record: AnalysisRecord) -> Result<AnalysisRecord>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<AnalysisRecord>>;

    /// Replace the stored record with the same id. Fails when the record
    /// no longer exists.
    async fn update(&self, record: AnalysisRecord) -> Result<AnalysisRecord>;

    /// Returns false when no record matched
    async fn delete_by_id(&self, id: Uuid) -> Result<bool>;

    /// Missing ids are skipped, not errors
    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64>;

    /// Filtered page sorted by upload timestamp descending, plus the
    /// total count matching the filter
    async fn query(
        &self,
        filter: &AnalysisFilter,
        skip: u64,
        limit: u64,
    ) -> Result<(Vec<AnalysisRecord>, u64)>;

    /// Aggregate statistics over all records in the given status
    async fn aggregate_stats(&self, status: AnalysisStatus) -> Result<AnalysisStats>;

    /// Connectivity probe for readiness checks
    async fn ping(&self) -> Result<()>;
}
