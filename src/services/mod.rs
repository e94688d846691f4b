//! Service layer wiring

pub mod query;
pub mod report;
pub mod upload;

use std::sync::Arc;

use crate::classifier::Classifier;
use crate::config::AppConfig;
use crate::db::AnalysisStore;
use query::QueryService;
use report::{ReportExporter, TextReportExporter};
use upload::UploadService;

/// Shared application state injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn AnalysisStore>,
    pub upload_service: Arc<UploadService>,
    pub query_service: Arc<QueryService>,
    pub report_exporter: Arc<dyn ReportExporter>,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        store: Arc<dyn AnalysisStore>,
        classifier: Arc<dyn Classifier>,
    ) -> Self {
        Self {
            upload_service: Arc::new(UploadService::new(
                store.clone(),
                classifier,
                config.upload.clone(),
            )),
            query_service: Arc::new(QueryService::new(store.clone())),
            report_exporter: Arc::new(TextReportExporter),
            store,
            config,
        }
    }
}
