//! Read side: filtered listings with pagination and aggregate statistics

use std::sync::Arc;

use metrics::counter;

use crate::db::models::{AnalysisRecord, AnalysisStats, AnalysisStatus};
use crate::db::{AnalysisFilter, AnalysisStore};
use crate::errors::Result;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// One page of listing results
#[derive(Debug, Clone)]
pub struct ListPage {
    pub items: Vec<AnalysisRecord>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
    pub statistics: AnalysisStats,
}

pub struct QueryService {
    store: Arc<dyn AnalysisStore>,
}

impl QueryService {
    pub fn new(store: Arc<dyn AnalysisStore>) -> Self {
        Self { store }
    }

    /// List records matching the filter, newest first. Statistics cover
    /// the whole completed population, not just the narrowed page (see
    /// DESIGN.md).
    pub async fn list(
        &self,
        filter: AnalysisFilter,
        page: u64,
        limit: u64,
    ) -> Result<ListPage> {
        let page = page.max(1);
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let skip = (page - 1) * limit;

        let (items, total) = self.store.query(&filter, skip, limit).await?;
        let statistics = self.store.aggregate_stats(AnalysisStatus::Completed).await?;

        counter!("paperinsight_list_queries_total").increment(1);

        Ok(ListPage {
            items,
            page,
            limit,
            total,
            pages: total.div_ceil(limit),
            statistics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{DocumentType, PaperNature};
    use crate::db::MemoryStore;
    use chrono::{Duration, Utc};

    async fn seeded_store(count: usize) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        let base = Utc::now();
        for index in 0..count {
            let mut record = AnalysisRecord::processing(
                format!("Paper {index}"),
                format!("paper-{index}.pdf"),
                1024,
            );
            record.upload_timestamp = base + Duration::seconds(index as i64);
            record.status = AnalysisStatus::Completed;
            record.document_type = if index % 2 == 0 {
                DocumentType::Conference
            } else {
                DocumentType::Journal
            };
            record.nature = PaperNature::Implementation;
            record.type_confidence = 0.8;
            record.nature_confidence = 0.9;
            store.create(record).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn paginates_25_records_into_3_pages() {
        let store = seeded_store(25).await;
        let service = QueryService::new(store);

        let page = service
            .list(AnalysisFilter::completed(), 2, 10)
            .await
            .unwrap();
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total, 25);
        assert_eq!(page.pages, 3);
        assert_eq!(page.page, 2);
        assert_eq!(page.limit, 10);
    }

    #[tokio::test]
    async fn empty_population_yields_zeroed_page_and_stats() {
        let service = QueryService::new(Arc::new(MemoryStore::new()));
        let page = service
            .list(AnalysisFilter::completed(), 1, 10)
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.pages, 0);
        assert_eq!(page.statistics.total_analyses, 0);
        assert_eq!(page.statistics.avg_type_confidence, 0.0);
    }

    #[tokio::test]
    async fn out_of_range_parameters_are_normalized() {
        let store = seeded_store(3).await;
        let service = QueryService::new(store);

        let page = service
            .list(AnalysisFilter::completed(), 0, 0)
            .await
            .unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 1);
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn statistics_ignore_the_listing_filter() {
        let store = seeded_store(10).await;
        let service = QueryService::new(store);

        let filter = AnalysisFilter {
            document_type: Some(DocumentType::Journal),
            ..AnalysisFilter::completed()
        };
        let page = service.list(filter, 1, 10).await.unwrap();
        assert_eq!(page.total, 5);
        // Stats still cover all 10 completed records
        assert_eq!(page.statistics.total_analyses, 10);
        assert_eq!(page.statistics.conference_count, 5);
        assert_eq!(page.statistics.journal_count, 5);
    }

    #[tokio::test]
    async fn newest_records_come_first() {
        let store = seeded_store(5).await;
        let service = QueryService::new(store);

        let page = service
            .list(AnalysisFilter::completed(), 1, 10)
            .await
            .unwrap();
        assert_eq!(page.items[0].title, "Paper 4");
        assert_eq!(page.items[4].title, "Paper 0");
    }
}
