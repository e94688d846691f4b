//! In-process analysis store
//!
//! Selected when `database.url` is the literal "memory". Keeps records in
//! insertion order inside a single RwLock'd Vec; linear scans are fine at
//! the scale this store is meant for (development and tests).

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{AnalysisRecord, AnalysisStats, AnalysisStatus, DocumentType, PaperNature};
use super::{AnalysisFilter, AnalysisStore};
use crate::errors::{AppError, Result};

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<AnalysisRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalysisStore for MemoryStore {
    async fn create(&self, record: AnalysisRecord) -> Result<AnalysisRecord> {
        let mut records = self.records.write().await;
        records.push(record.clone());
        Ok(record)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<AnalysisRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn update(&self, record: AnalysisRecord) -> Result<AnalysisRecord> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(record)
            }
            None => Err(AppError::not_found("Analysis", record.id)),
        }
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() < before)
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| !ids.contains(&r.id));
        Ok((before - records.len()) as u64)
    }

    async fn query(
        &self,
        filter: &AnalysisFilter,
        skip: u64,
        limit: u64,
    ) -> Result<(Vec<AnalysisRecord>, u64)> {
        let records = self.records.read().await;
        let mut matched: Vec<AnalysisRecord> =
            records.iter().filter(|r| filter.matches(r)).cloned().collect();
        // Stable sort keeps insertion order among equal timestamps
        matched.sort_by(|a, b| b.upload_timestamp.cmp(&a.upload_timestamp));

        let total = matched.len() as u64;
        let page: Vec<AnalysisRecord> = matched
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn aggregate_stats(&self, status: AnalysisStatus) -> Result<AnalysisStats> {
        let records = self.records.read().await;
        let matching: Vec<&AnalysisRecord> =
            records.iter().filter(|r| r.status == status).collect();

        let total = matching.len() as u64;
        if total == 0 {
            return Ok(AnalysisStats::default());
        }

        let count_where = |pred: &dyn Fn(&AnalysisRecord) -> bool| {
            matching.iter().filter(|r| pred(r)).count() as u64
        };

        let sum_type: f64 = matching.iter().map(|r| r.type_confidence).sum();
        let sum_nature: f64 = matching.iter().map(|r| r.nature_confidence).sum();

        Ok(AnalysisStats {
            total_analyses: total,
            conference_count: count_where(&|r| r.document_type == DocumentType::Conference),
            journal_count: count_where(&|r| r.document_type == DocumentType::Journal),
            implementation_count: count_where(&|r| r.nature == PaperNature::Implementation),
            theoretical_count: count_where(&|r| r.nature == PaperNature::Theoretical),
            avg_type_confidence: sum_type / total as f64,
            avg_nature_confidence: sum_nature / total as f64,
        })
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
