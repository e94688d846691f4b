//! Upload orchestration
//!
//! The core pipeline: validate the file, persist a `processing` record,
//! classify (external service first, deterministic fallback on any
//! failure), merge the outcome, and persist the terminal state. A
//! classifier failure degrades the result; it never fails the upload.

use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use tracing::{info, warn};

use crate::classifier::{
    title_from_file_name, Classifier, FallbackClassifier, UploadedFile,
};
use crate::config::UploadConfig;
use crate::db::models::AnalysisRecord;
use crate::db::AnalysisStore;
use crate::errors::{AppError, Result};

pub struct UploadService {
    store: Arc<dyn AnalysisStore>,
    classifier: Arc<dyn Classifier>,
    fallback: FallbackClassifier,
    config: UploadConfig,
}

impl UploadService {
    pub fn new(
        store: Arc<dyn AnalysisStore>,
        classifier: Arc<dyn Classifier>,
        config: UploadConfig,
    ) -> Self {
        Self {
            store,
            classifier,
            fallback: FallbackClassifier::new(),
            config,
        }
    }

    /// Run the full pipeline for one submitted file and return the
    /// terminal record
    pub async fn submit(&self, file: UploadedFile) -> Result<AnalysisRecord> {
        self.validate(&file)?;
        let started = Instant::now();

        let title = title_from_file_name(&file.name);
        let record =
            AnalysisRecord::processing(title, file.name.clone(), file.size_bytes);
        // First persistence write; from here on the store owns the record
        let record = self.store.create(record).await?;

        let outcome = match self.classifier.classify(&file).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    analysis_id = %record.id,
                    error = %err,
                    "classification service failed, engaging fallback"
                );
                self.fallback.classify(&file.name)
            }
        };
        let origin = outcome.origin.as_str();
        counter!("paperinsight_classifications_total", "origin" => origin).increment(1);

        let completed = record.clone().complete(outcome, started.elapsed());
        match self.store.update(completed).await {
            Ok(stored) => {
                counter!("paperinsight_uploads_total", "result" => "completed").increment(1);
                histogram!("paperinsight_upload_duration_seconds")
                    .record(started.elapsed().as_secs_f64());
                info!(
                    analysis_id = %stored.id,
                    origin,
                    processing_ms = stored.processing_time_ms,
                    "analysis completed"
                );
                Ok(stored)
            }
            Err(err) => {
                counter!("paperinsight_uploads_total", "result" => "error").increment(1);
                self.mark_errored(record, &err).await;
                Err(err)
            }
        }
    }

    fn validate(&self, file: &UploadedFile) -> Result<()> {
        if !self
            .config
            .allowed_mime_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&file.mime_type))
        {
            return Err(AppError::validation_field(
                format!("Unsupported file type: {}", file.mime_type),
                "file",
            ));
        }
        if file.size_bytes > self.config.max_file_size_bytes {
            return Err(AppError::validation_field(
                format!(
                    "File size {} exceeds the maximum of {} bytes",
                    file.size_bytes, self.config.max_file_size_bytes
                ),
                "file",
            ));
        }
        Ok(())
    }

    /// Best-effort transition to the terminal `error` state after a failed
    /// final write. The original failure is what the caller sees; a
    /// second write failure is only logged.
    async fn mark_errored(&self, record: AnalysisRecord, cause: &AppError) {
        let id = record.id;
        let errored = record.fail(&cause.to_string());
        if let Err(err) = self.store.update(errored).await {
            warn!(analysis_id = %id, error = %err, "failed to mark analysis as errored");
        }
    }
}
