//! HTTP client for the external classification service
//!
//! The whole call is bounded by the configured timeout. Timeouts,
//! transport errors, non-2xx responses, and malformed bodies all collapse
//! into `ClassifierUnavailable`; the pipeline treats them identically.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;

use super::{ClassificationOrigin, ClassificationResult, Classifier, UploadedFile};
use crate::config::ClassifierConfig;
use crate::errors::{AppError, Result};

/// Wire format of the `/analyze` response. Every field is optional;
/// conversion fills the gaps with safe defaults.
#[derive(Debug, Default, Deserialize)]
struct AnalyzeResponse {
    title: Option<String>,
    #[serde(rename = "type")]
    document_type: Option<String>,
    type_confidence: Option<f64>,
    nature: Option<String>,
    nature_confidence: Option<f64>,
    evidence: Option<Vec<String>>,
    keywords: Option<Vec<String>>,
}

impl From<AnalyzeResponse> for ClassificationResult {
    fn from(response: AnalyzeResponse) -> Self {
        ClassificationResult {
            title: response.title.filter(|t| !t.trim().is_empty()),
            document_type: response
                .document_type
                .as_deref()
                .map(|s| s.parse().unwrap_or_default())
                .unwrap_or_default(),
            type_confidence: response.type_confidence.unwrap_or(0.5),
            nature: response
                .nature
                .as_deref()
                .map(|s| s.parse().unwrap_or_default())
                .unwrap_or_default(),
            nature_confidence: response.nature_confidence.unwrap_or(0.5),
            evidence: response.evidence.unwrap_or_default(),
            keywords: response.keywords.unwrap_or_default(),
            origin: ClassificationOrigin::Service,
        }
    }
}

pub struct HttpClassifier {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, file: &UploadedFile) -> Result<ClassificationResult> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| AppError::ClassifierUnavailable(format!("invalid mime type: {e}")))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/analyze", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::ClassifierUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::ClassifierUnavailable(format!(
                "service returned {}",
                response.status()
            )));
        }

        let payload: AnalyzeResponse = response
            .json()
            .await
            .map_err(|e| AppError::ClassifierUnavailable(format!("malformed response: {e}")))?;

        Ok(payload.into())
    }
}
